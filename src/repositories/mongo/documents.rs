//! Stored shapes of the `orders`, `users` and `products` collections.
//!
//! Ids are `ObjectId`s and timestamps BSON dates, as the storefront's ODM
//! writes them; the entities keep hex ids and epoch-ms so the JSON surface
//! is unchanged.

use mongodb::bson::{oid::ObjectId, DateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::order::{Order, OrderItem, ShippingAddress};
use crate::entities::product::Product;
use crate::entities::user::{OwnerRef, User};
use crate::errors::RepoErr;

/// Id taken from a request path. A malformed id cannot name a document.
pub(super) fn parse_id(id: &str) -> Result<ObjectId, RepoErr> {
    ObjectId::parse_str(id).map_err(|_| RepoErr::NotFound)
}

/// Id a stored document will point at.
fn parse_ref(field: &str, id: &str) -> Result<ObjectId, RepoErr> {
    ObjectId::parse_str(id)
        .map_err(|_| RepoErr::InvalidReference(format!("{field} is not an ObjectId: {id}")))
}

fn millis(at: Option<DateTime>) -> i64 {
    at.map(|d| d.timestamp_millis()).unwrap_or(0)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDoc {
    pub slug: String,
    pub name: String,
    pub quantity: u32,
    pub image: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub product: ObjectId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub order_items: Vec<OrderItemDoc>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub items_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub user: ObjectId,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub paid_at: Option<DateTime>,
    #[serde(default)]
    pub is_delivered: bool,
    #[serde(default)]
    pub delivered_at: Option<DateTime>,
    #[serde(default)]
    pub created_at: Option<DateTime>,
    #[serde(default)]
    pub updated_at: Option<DateTime>,
}

impl TryFrom<&Order> for OrderDoc {
    type Error = RepoErr;

    fn try_from(o: &Order) -> Result<Self, Self::Error> {
        let order_items = o
            .order_items
            .iter()
            .map(|i| {
                Ok(OrderItemDoc {
                    slug: i.slug.clone(),
                    name: i.name.clone(),
                    quantity: i.quantity,
                    image: i.image.clone(),
                    price: i.price,
                    product: parse_ref("orderItems.product", &i.product)?,
                })
            })
            .collect::<Result<Vec<_>, RepoErr>>()?;

        Ok(Self {
            id: parse_ref("_id", &o.id)?,
            order_items,
            shipping_address: o.shipping_address.clone(),
            payment_method: o.payment_method.clone(),
            items_price: o.items_price,
            shipping_price: o.shipping_price,
            tax_price: o.tax_price,
            total_price: o.total_price,
            user: parse_ref("user", &o.user)?,
            is_paid: o.is_paid,
            paid_at: o.paid_at.map(DateTime::from_millis),
            is_delivered: o.is_delivered,
            delivered_at: o.delivered_at.map(DateTime::from_millis),
            created_at: Some(DateTime::from_millis(o.created_at)),
            updated_at: Some(DateTime::from_millis(o.updated_at)),
        })
    }
}

impl From<OrderDoc> for Order {
    fn from(d: OrderDoc) -> Self {
        Self {
            id: d.id.to_hex(),
            order_items: d
                .order_items
                .into_iter()
                .map(|i| OrderItem {
                    slug: i.slug,
                    name: i.name,
                    quantity: i.quantity,
                    image: i.image,
                    price: i.price,
                    product: i.product.to_hex(),
                })
                .collect(),
            shipping_address: d.shipping_address,
            payment_method: d.payment_method,
            items_price: d.items_price,
            shipping_price: d.shipping_price,
            tax_price: d.tax_price,
            total_price: d.total_price,
            user: d.user.to_hex(),
            is_paid: d.is_paid,
            paid_at: d.paid_at.map(|t| t.timestamp_millis()),
            is_delivered: d.is_delivered,
            delivered_at: d.delivered_at.map(|t| t.timestamp_millis()),
            created_at: millis(d.created_at),
            updated_at: millis(d.updated_at),
        }
    }
}

/// Read-only view of a user; credential fields are never deserialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub created_at: Option<DateTime>,
    #[serde(default)]
    pub updated_at: Option<DateTime>,
}

impl From<UserDoc> for User {
    fn from(d: UserDoc) -> Self {
        Self {
            id: d.id.to_hex(),
            name: d.name,
            email: d.email,
            is_admin: d.is_admin,
            created_at: millis(d.created_at),
            updated_at: millis(d.updated_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OwnerDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
}

impl From<OwnerDoc> for OwnerRef {
    fn from(d: OwnerDoc) -> Self {
        Self {
            id: d.id.to_hex(),
            name: d.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub slug: String,
    pub image: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub count_in_stock: u32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub num_reviews: u32,
}

impl From<ProductDoc> for Product {
    fn from(d: ProductDoc) -> Self {
        Self {
            id: d.id.to_hex(),
            name: d.name,
            slug: d.slug,
            image: d.image,
            brand: d.brand,
            category: d.category,
            description: d.description,
            price: d.price,
            count_in_stock: d.count_in_stock,
            rating: d.rating,
            num_reviews: d.num_reviews,
        }
    }
}
