use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    models::product::Product,
    schema::{order_lines, orders},
};

/// Persistence state of an order.
///
/// On the wire this is the plain integer id, where `0` marks an order that
/// has not been stored yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "i32", into = "i32")]
pub enum OrderKey {
    #[default]
    New,
    Existing(i32),
}

impl OrderKey {
    pub fn id(self) -> Option<i32> {
        match self {
            OrderKey::New => None,
            OrderKey::Existing(id) => Some(id),
        }
    }

    pub fn is_new(self) -> bool {
        matches!(self, OrderKey::New)
    }
}

impl From<i32> for OrderKey {
    fn from(id: i32) -> Self {
        match id {
            0 => OrderKey::New,
            id => OrderKey::Existing(id),
        }
    }
}

impl From<OrderKey> for i32 {
    fn from(key: OrderKey) -> Self {
        key.id().unwrap_or(0)
    }
}

impl std::fmt::Display for OrderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderKey::New => write!(f, "new"),
            OrderKey::Existing(id) => write!(f, "{id}"),
        }
    }
}

/// An order aggregate: the order row plus its lines, each with its product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Order {
    #[serde(default)]
    pub order_id: OrderKey,
    #[serde(default)]
    pub lines: Vec<OrderLine>,
    pub name: String,
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    #[serde(default)]
    pub line3: Option<String>,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub zip: Option<String>,
    pub country: String,
    #[serde(default)]
    pub gift_wrap: bool,
    #[serde(default)]
    pub shipped: bool,
}

impl Order {
    /// Total quantity across all lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|line| i64::from(line.quantity)).sum()
    }

    pub fn total(&self) -> rust_decimal::Decimal {
        self.lines.iter().map(OrderLine::subtotal).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct OrderLine {
    #[serde(default)]
    pub order_line_id: i32,
    pub product: Product,
    pub quantity: i32,
}

impl OrderLine {
    pub fn subtotal(&self) -> rust_decimal::Decimal {
        self.product.price * rust_decimal::Decimal::from(self.quantity)
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderRow {
    pub order_id: i32,
    pub name: String,
    pub line1: String,
    pub line2: Option<String>,
    pub line3: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: Option<String>,
    pub country: String,
    pub gift_wrap: bool,
    pub shipped: bool,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            order_id: OrderKey::Existing(row.order_id),
            lines: Vec::new(),
            name: row.name,
            line1: row.line1,
            line2: row.line2,
            line3: row.line3,
            city: row.city,
            state: row.state,
            zip: row.zip,
            country: row.country,
            gift_wrap: row.gift_wrap,
            shipped: row.shipped,
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = order_lines)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderLineRow {
    pub order_line_id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

/// Column values of an order, used for both insert and in-place update.
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = orders)]
#[diesel(treat_none_as_null = true)]
pub struct OrderChanges<'a> {
    pub name: &'a str,
    pub line1: &'a str,
    pub line2: Option<&'a str>,
    pub line3: Option<&'a str>,
    pub city: &'a str,
    pub state: &'a str,
    pub zip: Option<&'a str>,
    pub country: &'a str,
    pub gift_wrap: bool,
    pub shipped: bool,
}

impl<'a> From<&'a Order> for OrderChanges<'a> {
    fn from(order: &'a Order) -> Self {
        Self {
            name: &order.name,
            line1: &order.line1,
            line2: order.line2.as_deref(),
            line3: order.line3.as_deref(),
            city: &order.city,
            state: &order.state,
            zip: order.zip.as_deref(),
            country: &order.country,
            gift_wrap: order.gift_wrap,
            shipped: order.shipped,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = order_lines)]
pub struct NewOrderLine {
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_order_key_wire_value() {
        assert_eq!(OrderKey::from(0), OrderKey::New);
        assert_eq!(OrderKey::from(12), OrderKey::Existing(12));
        assert_eq!(i32::from(OrderKey::New), 0);
        assert_eq!(i32::from(OrderKey::Existing(12)), 12);
    }

    #[test]
    fn test_deserialize_checkout_order() {
        let json = r#"{
            "order_id": 0,
            "name": "Joe Bloggs",
            "line1": "1 Main Street",
            "city": "Springfield",
            "state": "IL",
            "country": "USA",
            "gift_wrap": true,
            "lines": [
                { "product": { "product_id": 7 }, "quantity": 2 }
            ]
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();

        assert!(order.order_id.is_new());
        assert!(order.gift_wrap);
        assert!(!order.shipped);
        assert_eq!(order.line2, None);
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines[0].product.product_id, 7);
        assert_eq!(order.lines[0].product.name, "");
        assert_eq!(order.lines[0].order_line_id, 0);
    }

    #[test]
    fn test_serialize_existing_order_id() {
        let order = Order {
            order_id: OrderKey::Existing(3),
            ..Default::default()
        };

        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["order_id"], 3);
    }

    #[test]
    fn test_order_totals() {
        let product = |price: i64| Product {
            product_id: 1,
            price: Decimal::new(price, 2),
            ..Default::default()
        };
        let order = Order {
            lines: vec![
                OrderLine {
                    order_line_id: 0,
                    product: product(27500),
                    quantity: 2,
                },
                OrderLine {
                    order_line_id: 0,
                    product: product(4895),
                    quantity: 1,
                },
            ],
            ..Default::default()
        };

        assert_eq!(order.item_count(), 3);
        assert_eq!(order.total(), Decimal::new(59895, 2));
    }
}
