use diesel::{prelude::*, sql_types::Integer, sql_types::Text};

use crate::{
    connection::DbConnection,
    models::{
        order::{Order, OrderLine},
        product::Product,
    },
    repository::product::ProductStore,
};

/// Inserts a product row with a fixed id, bypassing the repository.
pub fn seed_product(db: &mut DbConnection, id: i32, name: &str, price: &str) -> Product {
    diesel::sql_query(
        "INSERT INTO products (product_id, name, description, price, category) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind::<Integer, _>(id)
    .bind::<Text, _>(name)
    .bind::<Text, _>(format!("{name} description"))
    .bind::<Text, _>(price)
    .bind::<Text, _>("Watersports")
    .execute(db.conn())
    .unwrap();

    ProductStore::new(db.conn()).find(id).unwrap().unwrap()
}

/// An order as it arrives from checkout: new, with the given lines.
pub fn checkout_order(lines: &[(Product, i32)]) -> Order {
    Order {
        name: "Joe Bloggs".to_string(),
        line1: "1 Main Street".to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        country: "USA".to_string(),
        lines: lines
            .iter()
            .map(|(product, quantity)| OrderLine {
                order_line_id: 0,
                product: product.clone(),
                quantity: *quantity,
            })
            .collect(),
        ..Default::default()
    }
}
