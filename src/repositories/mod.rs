pub mod in_memory;
pub mod mongo;

use async_trait::async_trait;

use crate::{
    entities::{
        order::{NewOrder, Order},
        product::Product,
        user::{OwnerRef, User},
    },
    errors::RepoErr,
};

#[derive(Debug, Clone, Default)]
pub struct ListOrdersQuery {
    /// Restrict to orders owned by this user id.
    pub user: Option<String>,
}

impl ListOrdersQuery {
    pub fn owned_by(user: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
        }
    }
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create(&self, new: NewOrder) -> Result<Order, RepoErr>;
    async fn get_by_id(&self, id: &str) -> Result<Order, RepoErr>;
    async fn list(&self, q: ListOrdersQuery) -> Result<Vec<Order>, RepoErr>;
    async fn mark_paid(&self, id: &str, at: i64) -> Result<Order, RepoErr>;
    async fn mark_delivered(&self, id: &str, at: i64) -> Result<Order, RepoErr>;
    async fn delete(&self, id: &str) -> Result<(), RepoErr>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, RepoErr>;
    /// `{ _id, name }` for each id that exists; unknown ids are skipped.
    async fn names_by_ids(&self, ids: &[String]) -> Result<Vec<OwnerRef>, RepoErr>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, RepoErr>;
}
