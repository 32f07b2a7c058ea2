use std::collections::{BTreeSet, HashMap};

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::auth::{AdminUser, AuthUser};
use crate::entities::order::{NewOrder, Order, OrderItem, ShippingAddress};
use crate::entities::product::Product;
use crate::entities::user::{OwnerRef, User};
use crate::errors::ApiError;
use crate::repositories::ListOrdersQuery;
use crate::state::AppState;
use crate::utils::now_ms;

const ORDER_NOT_FOUND: &str = "Order Not Found";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    /// Product id; copied into the stored item's `product`.
    #[serde(rename = "_id")]
    pub id: String,
    pub slug: String,
    pub name: String,
    pub quantity: u32,
    pub image: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl From<OrderItemPayload> for OrderItem {
    fn from(p: OrderItemPayload) -> Self {
        Self {
            slug: p.slug,
            name: p.name,
            quantity: p.quantity,
            image: p.image,
            price: p.price,
            product: p.id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    pub order_items: Vec<OrderItemPayload>,
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
}

impl CreateOrderPayload {
    fn into_new_order(self, owner: String) -> NewOrder {
        NewOrder {
            order_items: self.order_items.into_iter().map(OrderItem::from).collect(),
            shipping_address: self.shipping_address,
            payment_method: self.payment_method,
            items_price: self.items_price,
            shipping_price: self.shipping_price,
            tax_price: self.tax_price,
            total_price: self.total_price,
            user: owner,
        }
    }
}

#[derive(Debug, Serialize)]
struct Message {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct OrderMessage {
    message: &'static str,
    order: Order,
}

#[derive(Debug, Serialize)]
struct Summary {
    users: Vec<User>,
    orders: Vec<Order>,
    products: Vec<Product>,
}

#[instrument(skip_all, fields(admin_id = %admin.0.id))]
pub async fn list_orders(
    admin: AdminUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let orders = state.orders.list(ListOrdersQuery::default()).await?;

    let owner_ids: Vec<String> = orders
        .iter()
        .map(|o| o.user.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let owners: HashMap<String, OwnerRef> = state
        .users
        .names_by_ids(&owner_ids)
        .await?
        .into_iter()
        .map(|u| (u.id.clone(), u))
        .collect();

    let populated: Vec<Order<Option<OwnerRef>>> = orders
        .into_iter()
        .map(|o| {
            let owner = owners.get(&o.user).cloned();
            o.with_owner(owner)
        })
        .collect();
    Ok(HttpResponse::Ok().json(populated))
}

#[instrument(skip_all, fields(user_id = %user.id, items = payload.order_items.len()))]
pub async fn create_order(
    user: AuthUser,
    state: web::Data<AppState>,
    payload: web::Json<CreateOrderPayload>,
) -> Result<HttpResponse, ApiError> {
    let new = payload.into_inner().into_new_order(user.id);
    let order = state.orders.create(new).await?;
    info!(order_id = %order.id, total = %order.total_price, "order created");
    Ok(HttpResponse::Created().json(OrderMessage {
        message: "New Order Created",
        order,
    }))
}

#[instrument(skip_all, fields(admin_id = %admin.0.id))]
pub async fn summary(
    admin: AdminUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let orders = state.orders.list(ListOrdersQuery::default()).await?;
    let users = state.users.list().await?;
    let products = state.products.list().await?;
    Ok(HttpResponse::Ok().json(Summary {
        users,
        orders,
        products,
    }))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn list_mine(
    user: AuthUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let orders = state.orders.list(ListOrdersQuery::owned_by(user.id)).await?;
    Ok(HttpResponse::Ok().json(orders))
}

#[instrument(skip_all, fields(user_id = %user.id, order_id = %path.as_str()))]
pub async fn get_order(
    user: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let order = state
        .orders
        .get_by_id(&id)
        .await
        .map_err(|e| e.into_api(ORDER_NOT_FOUND))?;
    Ok(HttpResponse::Ok().json(order))
}

// No auth extractor: this route is public.
#[instrument(skip_all, fields(order_id = %path.as_str()))]
pub async fn pay_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let order = state
        .orders
        .mark_paid(&id, now_ms())
        .await
        .map_err(|e| e.into_api(ORDER_NOT_FOUND))?;
    info!("order paid");
    Ok(HttpResponse::Ok().json(OrderMessage {
        message: "Order Paid",
        order,
    }))
}

#[instrument(skip_all, fields(user_id = %user.id, order_id = %path.as_str()))]
pub async fn deliver_order(
    user: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    state
        .orders
        .mark_delivered(&id, now_ms())
        .await
        .map_err(|e| e.into_api(ORDER_NOT_FOUND))?;
    info!("order delivered");
    Ok(HttpResponse::Ok().json(Message {
        message: "Order Delivered",
    }))
}

#[instrument(skip_all, fields(admin_id = %admin.0.id, order_id = %path.as_str()))]
pub async fn delete_order(
    admin: AdminUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    state
        .orders
        .delete(&id)
        .await
        .map_err(|e| e.into_api(ORDER_NOT_FOUND))?;
    info!("order deleted");
    Ok(HttpResponse::Ok().json(Message {
        message: "Order Deleted",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn payload_copies_item_id_into_product() {
        let payload: CreateOrderPayload = serde_json::from_value(json!({
            "orderItems": [{
                "_id": "64b7f0c2a1b2c3d4e5f60718",
                "name": "Adidas Fit Pant",
                "slug": "adidas-fit-pant",
                "quantity": 3,
                "image": "/images/p3.jpg",
                "price": 25,
                "countInStock": 15
            }],
            "shippingAddress": {
                "fullName": "Jane Doe",
                "address": "1 Main St",
                "city": "Springfield",
                "postalCode": "12345",
                "country": "US"
            },
            "paymentMethod": "Stripe",
            "itemsPrice": 75,
            "shippingPrice": 10,
            "taxPrice": 11.25,
            "totalPrice": 96.25
        }))
        .unwrap();

        let new = payload.into_new_order("owner-1".into());
        assert_eq!(new.user, "owner-1");
        assert_eq!(new.order_items.len(), 1);
        assert_eq!(new.order_items[0].product, "64b7f0c2a1b2c3d4e5f60718");
        assert_eq!(new.order_items[0].quantity, 3);
        assert_eq!(new.order_items[0].price, dec!(25));
        assert_eq!(new.tax_price, dec!(11.25));
        assert_eq!(new.total_price, dec!(96.25));
    }
}
