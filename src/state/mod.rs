use crate::auth::JwtService;
use crate::repositories::{OrderRepository, ProductRepository, UserRepository};
use actix_web::web::Data;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<dyn OrderRepository>,
    pub users: Arc<dyn UserRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub jwt: JwtService,
}

impl AppState {
    /// Wires every collection to the same backing store.
    pub fn new<S>(store: S, jwt: JwtService) -> Data<Self>
    where
        S: OrderRepository + UserRepository + ProductRepository + Clone + 'static,
    {
        Data::new(Self {
            orders: Arc::new(store.clone()),
            users: Arc::new(store.clone()),
            products: Arc::new(store),
            jwt,
        })
    }
}
