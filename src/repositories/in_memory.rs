use crate::entities::order::{NewOrder, Order};
use crate::entities::product::Product;
use crate::entities::user::{OwnerRef, User};
use crate::errors::RepoErr;
use crate::repositories::{ListOrdersQuery, OrderRepository, ProductRepository, UserRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local store backing all three collections. Listing is in ascending
/// id order.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    orders: Arc<RwLock<HashMap<String, Order>>>,
    users: Arc<RwLock<HashMap<String, User>>>,
    products: Arc<RwLock<HashMap<String, Product>>>,
}

impl InMemoryStore {
    pub async fn insert_user(&self, user: User) {
        let mut w = self.users.write().await;
        w.insert(user.id.clone(), user);
    }

    pub async fn insert_product(&self, product: Product) {
        let mut w = self.products.write().await;
        w.insert(product.id.clone(), product);
    }

    async fn update_order(
        &self,
        id: &str,
        apply: impl FnOnce(&mut Order) + Send,
    ) -> Result<Order, RepoErr> {
        let mut map = self.orders.write().await;
        let o = map.get_mut(id).ok_or(RepoErr::NotFound)?;
        apply(o);
        Ok(o.clone())
    }
}

fn sorted_by_id<T: Clone>(map: &HashMap<String, T>) -> Vec<T> {
    let mut entries: Vec<(&String, &T)> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries.into_iter().map(|(_, v)| v.clone()).collect()
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn create(&self, new: NewOrder) -> Result<Order, RepoErr> {
        let mut map = self.orders.write().await;
        let order = Order::new(new);
        map.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn get_by_id(&self, id: &str) -> Result<Order, RepoErr> {
        let map = self.orders.read().await;
        map.get(id).cloned().ok_or(RepoErr::NotFound)
    }

    async fn list(&self, q: ListOrdersQuery) -> Result<Vec<Order>, RepoErr> {
        let map = self.orders.read().await;
        let mut items = sorted_by_id(&map);

        if let Some(user) = q.user {
            items.retain(|o| o.user == user);
        }

        Ok(items)
    }

    async fn mark_paid(&self, id: &str, at: i64) -> Result<Order, RepoErr> {
        self.update_order(id, |o| o.mark_paid(at)).await
    }

    async fn mark_delivered(&self, id: &str, at: i64) -> Result<Order, RepoErr> {
        self.update_order(id, |o| o.mark_delivered(at)).await
    }

    async fn delete(&self, id: &str) -> Result<(), RepoErr> {
        let mut map = self.orders.write().await;
        map.remove(id).map(|_| ()).ok_or(RepoErr::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<User>, RepoErr> {
        let map = self.users.read().await;
        Ok(sorted_by_id(&map))
    }

    async fn names_by_ids(&self, ids: &[String]) -> Result<Vec<OwnerRef>, RepoErr> {
        let map = self.users.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| map.get(id))
            .map(User::owner_ref)
            .collect())
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Product>, RepoErr> {
        let map = self.products.read().await;
        Ok(sorted_by_id(&map))
    }
}
