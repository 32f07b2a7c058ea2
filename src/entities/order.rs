use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::{new_object_id, now_ms};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub slug: String,
    pub name: String,
    pub quantity: u32,
    pub image: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub product: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// A placed order. `U` is the owner: a bare user id as stored, or a
/// populated [`OwnerRef`](crate::entities::user::OwnerRef) for admin listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order<U = String> {
    #[serde(rename = "_id")]
    pub id: String,
    pub order_items: Vec<OrderItem>,
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
    pub user: U,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub paid_at: Option<i64>,
    #[serde(default)]
    pub is_delivered: bool,
    #[serde(default)]
    pub delivered_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub items_price: Decimal,
    pub shipping_price: Decimal,
    pub tax_price: Decimal,
    pub total_price: Decimal,
    pub user: String,
}

impl Order {
    pub fn new(new: NewOrder) -> Self {
        let now = now_ms();
        Self {
            id: new_object_id(),
            order_items: new.order_items,
            shipping_address: new.shipping_address,
            payment_method: new.payment_method,
            items_price: new.items_price,
            shipping_price: new.shipping_price,
            tax_price: new.tax_price,
            total_price: new.total_price,
            user: new.user,
            is_paid: false,
            paid_at: None,
            is_delivered: false,
            delivered_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mark_paid(&mut self, at: i64) {
        self.is_paid = true;
        self.paid_at = Some(at);
        self.updated_at = at;
    }

    pub fn mark_delivered(&mut self, at: i64) {
        self.is_delivered = true;
        self.delivered_at = Some(at);
        self.updated_at = at;
    }
}

impl<U> Order<U> {
    /// Swaps the owner field, keeping everything else.
    pub fn with_owner<V>(self, user: V) -> Order<V> {
        Order {
            id: self.id,
            order_items: self.order_items,
            shipping_address: self.shipping_address,
            payment_method: self.payment_method,
            items_price: self.items_price,
            shipping_price: self.shipping_price,
            tax_price: self.tax_price,
            total_price: self.total_price,
            user,
            is_paid: self.is_paid,
            paid_at: self.paid_at,
            is_delivered: self.is_delivered,
            delivered_at: self.delivered_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;
    use crate::entities::user::OwnerRef;

    fn is_plausible_ms(ts: i64) -> bool {
        (1_000_000_000_000..=4_000_000_000_000).contains(&ts)
    }

    fn sample_new() -> NewOrder {
        NewOrder {
            order_items: vec![OrderItem {
                slug: "nike-slim-shirt".into(),
                name: "Nike Slim shirt".into(),
                quantity: 2,
                image: "/images/p1.jpg".into(),
                price: dec!(120),
                product: "64b7f0c2a1b2c3d4e5f60718".into(),
            }],
            shipping_address: ShippingAddress {
                full_name: "Jane Doe".into(),
                address: "1 Main St".into(),
                city: "Springfield".into(),
                postal_code: "12345".into(),
                country: "US".into(),
            },
            payment_method: "PayPal".into(),
            items_price: dec!(240),
            shipping_price: dec!(0),
            tax_price: dec!(36),
            total_price: dec!(276),
            user: "user-1".into(),
        }
    }

    #[test]
    fn order_new_starts_unpaid_and_undelivered() {
        let o = Order::new(sample_new());
        assert_eq!(o.id.len(), 24);
        assert_eq!(o.user, "user-1");
        assert_eq!(o.total_price, dec!(276));
        assert!(!o.is_paid);
        assert!(o.paid_at.is_none());
        assert!(!o.is_delivered);
        assert!(o.delivered_at.is_none());
        assert!(
            is_plausible_ms(o.created_at),
            "created_at not plausible ms: {}",
            o.created_at
        );
        assert_eq!(o.created_at, o.updated_at);
    }

    #[test]
    fn mark_paid_and_delivered_set_flags_and_timestamps() {
        let mut o = Order::new(sample_new());
        o.mark_paid(1_800_000_000_000);
        assert!(o.is_paid);
        assert_eq!(o.paid_at, Some(1_800_000_000_000));
        assert_eq!(o.updated_at, 1_800_000_000_000);

        o.mark_delivered(1_800_000_000_500);
        assert!(o.is_delivered);
        assert_eq!(o.delivered_at, Some(1_800_000_000_500));
        assert_eq!(o.updated_at, 1_800_000_000_500);
    }

    #[test]
    fn order_serializes_with_camel_case_and_numeric_prices() {
        let o = Order::new(sample_new());
        let v = serde_json::to_value(&o).unwrap();
        assert_eq!(v["_id"], json!(o.id));
        assert_eq!(v["isPaid"], json!(false));
        assert_eq!(v["paidAt"], json!(null));
        assert_eq!(v["totalPrice"], json!(276.0));
        assert_eq!(v["orderItems"][0]["product"], json!("64b7f0c2a1b2c3d4e5f60718"));
        assert_eq!(v["shippingAddress"]["postalCode"], json!("12345"));
    }

    #[test]
    fn with_owner_replaces_only_the_user() {
        let o = Order::new(sample_new());
        let id = o.id.clone();
        let populated = o.with_owner(Some(OwnerRef {
            id: "user-1".into(),
            name: "Jane".into(),
        }));
        assert_eq!(populated.id, id);
        let v = serde_json::to_value(&populated).unwrap();
        assert_eq!(v["user"], json!({ "_id": "user-1", "name": "Jane" }));
    }
}
