mod documents;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    options::ReturnDocument,
    Client, Collection, Database,
};
use tracing::{debug, info, instrument};

use crate::entities::order::{NewOrder, Order};
use crate::entities::product::Product;
use crate::entities::user::{OwnerRef, User};
use crate::errors::RepoErr;
use crate::repositories::{ListOrdersQuery, OrderRepository, ProductRepository, UserRepository};

use documents::{parse_id, OrderDoc, OwnerDoc, ProductDoc, UserDoc};

const ORDERS: &str = "orders";
const USERS: &str = "users";
const PRODUCTS: &str = "products";

/// MongoDB-backed store over the ODM's `orders`, `users` and `products`
/// collections.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

fn id_filter(id: &str) -> Result<Document, RepoErr> {
    Ok(doc! { "_id": parse_id(id)? })
}

/// `None` when the owner id cannot match any stored order.
fn list_filter(q: &ListOrdersQuery) -> Option<Document> {
    match &q.user {
        Some(user) => ObjectId::parse_str(user)
            .ok()
            .map(|oid| doc! { "user": oid }),
        None => Some(doc! {}),
    }
}

fn owners_filter(ids: &[String]) -> Document {
    let oids: Vec<ObjectId> = ids
        .iter()
        .filter_map(|id| ObjectId::parse_str(id).ok())
        .collect();
    doc! { "_id": { "$in": oids } }
}

fn paid_update(at: i64) -> Document {
    let at = DateTime::from_millis(at);
    doc! { "$set": { "isPaid": true, "paidAt": at, "updatedAt": at } }
}

fn delivered_update(at: i64) -> Document {
    let at = DateTime::from_millis(at);
    doc! { "$set": { "isDelivered": true, "deliveredAt": at, "updatedAt": at } }
}

impl MongoStore {
    #[instrument(name = "mongo_connect", skip_all, fields(%db_name))]
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, RepoErr> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(db_name);
        db.run_command(doc! { "ping": 1 }).await?;
        info!("connected to mongodb");
        Ok(Self { db })
    }

    fn orders(&self) -> Collection<OrderDoc> {
        self.db.collection(ORDERS)
    }

    fn users(&self) -> Collection<UserDoc> {
        self.db.collection(USERS)
    }

    fn products(&self) -> Collection<ProductDoc> {
        self.db.collection(PRODUCTS)
    }

    async fn update_order(&self, id: &str, update: Document) -> Result<Order, RepoErr> {
        self.orders()
            .find_one_and_update(id_filter(id)?, update)
            .return_document(ReturnDocument::After)
            .await?
            .map(Order::from)
            .ok_or(RepoErr::NotFound)
    }
}

#[async_trait]
impl OrderRepository for MongoStore {
    async fn create(&self, new: NewOrder) -> Result<Order, RepoErr> {
        let order = Order::new(new);
        self.orders().insert_one(OrderDoc::try_from(&order)?).await?;
        debug!(order_id = %order.id, "inserted order");
        Ok(order)
    }

    async fn get_by_id(&self, id: &str) -> Result<Order, RepoErr> {
        self.orders()
            .find_one(id_filter(id)?)
            .await?
            .map(Order::from)
            .ok_or(RepoErr::NotFound)
    }

    async fn list(&self, q: ListOrdersQuery) -> Result<Vec<Order>, RepoErr> {
        let Some(filter) = list_filter(&q) else {
            return Ok(vec![]);
        };
        let cursor = self.orders().find(filter).sort(doc! { "_id": 1 }).await?;
        let docs: Vec<OrderDoc> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Order::from).collect())
    }

    async fn mark_paid(&self, id: &str, at: i64) -> Result<Order, RepoErr> {
        self.update_order(id, paid_update(at)).await
    }

    async fn mark_delivered(&self, id: &str, at: i64) -> Result<Order, RepoErr> {
        self.update_order(id, delivered_update(at)).await
    }

    async fn delete(&self, id: &str) -> Result<(), RepoErr> {
        let res = self.orders().delete_one(id_filter(id)?).await?;
        if res.deleted_count == 0 {
            return Err(RepoErr::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoStore {
    async fn list(&self) -> Result<Vec<User>, RepoErr> {
        let cursor = self.users().find(doc! {}).await?;
        let docs: Vec<UserDoc> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(User::from).collect())
    }

    async fn names_by_ids(&self, ids: &[String]) -> Result<Vec<OwnerRef>, RepoErr> {
        let cursor = self
            .db
            .collection::<OwnerDoc>(USERS)
            .find(owners_filter(ids))
            .projection(doc! { "name": 1 })
            .await?;
        let docs: Vec<OwnerDoc> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(OwnerRef::from).collect())
    }
}

#[async_trait]
impl ProductRepository for MongoStore {
    async fn list(&self) -> Result<Vec<Product>, RepoErr> {
        let cursor = self.products().find(doc! {}).await?;
        let docs: Vec<ProductDoc> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Product::from).collect())
    }
}
