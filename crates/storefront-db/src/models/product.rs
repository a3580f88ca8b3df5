use diesel::{prelude::*, sqlite::Sqlite};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::schema::products;

/// A catalog item. Identity is `product_id`; `0` means not yet stored.
///
/// Only the id matters when a product is referenced from an order line, so
/// every other field defaults when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, Selectable)]
#[diesel(table_name = products)]
pub struct Product {
    #[serde(default)]
    pub product_id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
}

impl Queryable<products::SqlType, Sqlite> for Product {
    type Row = (i32, String, String, String, String);

    fn build(row: Self::Row) -> diesel::deserialize::Result<Self> {
        Ok(Self {
            product_id: row.0,
            name: row.1,
            description: row.2,
            price: row.3.parse::<Decimal>()?,
            category: row.4,
        })
    }
}

impl Product {
    pub fn is_new(&self) -> bool {
        self.product_id == 0
    }
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = products)]
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub price: String,
    pub category: &'a str,
}

impl<'a> From<&'a Product> for NewProduct<'a> {
    fn from(product: &'a Product) -> Self {
        Self {
            name: &product.name,
            description: &product.description,
            price: product.price.to_string(),
            category: &product.category,
        }
    }
}
