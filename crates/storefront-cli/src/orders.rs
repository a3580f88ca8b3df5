use std::{fs::File, io::Read};

use nu_ansi_term::Color::{Blue, Cyan, Green, Yellow};
use storefront_db::{
    connection::DbConnection,
    models::order::{Order, OrderKey},
    repository::order::{OrderQuery, OrderRepository, Orders},
};
use tabled::{
    builder::Builder,
    settings::{Panel, Style},
};
use tracing::{debug, info};

use crate::{
    error::{ErrorContext, StorefrontError, StorefrontResult},
    utils::{format_price, print_json, yes_no, Colored},
};

pub fn list_orders(db: &mut DbConnection, query: OrderQuery, json: bool) -> StorefrontResult<()> {
    debug!(
        shipped = ?query.shipped,
        limit = ?query.limit,
        "listing orders"
    );

    let orders = db.orders().query(&query)?;

    if json {
        return print_json(&orders);
    }

    if orders.is_empty() {
        info!("No orders found");
        return Ok(());
    }

    info!("\n{}", orders_table(&orders));
    info!(
        "{} order(s), {} unshipped",
        Colored(Cyan, orders.len()),
        Colored(Yellow, orders.iter().filter(|order| !order.shipped).count())
    );

    Ok(())
}

pub fn show_order(db: &mut DbConnection, order_id: i32, json: bool) -> StorefrontResult<()> {
    let order = db
        .orders()
        .find(order_id)?
        .ok_or(StorefrontError::OrderNotFound(order_id))?;

    if json {
        return print_json(&order);
    }

    info!("\n{}", order_table(&order));
    Ok(())
}

/// Saves an order read from `source`, a file path or `-` for stdin.
pub fn save_order(db: &mut DbConnection, source: &str, json: bool) -> StorefrontResult<()> {
    let document = if source == "-" {
        read_order(std::io::stdin().lock())?
    } else {
        let file =
            File::open(source).with_context(|| format!("opening order file {source}"))?;
        read_order(file)?
    };

    let mut order = document.order;
    if let (OrderKey::Existing(order_id), None) = (order.order_id, document.shipped) {
        if let Some(stored) = db.orders().find(order_id)? {
            order.shipped = stored.shipped;
        }
    }

    let created = order.order_id.is_new();
    db.orders().save_order(&mut order)?;

    if json {
        return print_json(&order);
    }

    info!(
        order_id = i32::from(order.order_id),
        lines = order.lines.len(),
        "{} order {} for {} ({} item(s), {})",
        if created { "Created" } else { "Updated" },
        Colored(Cyan, order.order_id),
        Colored(Blue, &order.name),
        order.item_count(),
        Colored(Green, format_price(order.total()))
    );

    Ok(())
}

pub fn ship_order(db: &mut DbConnection, order_id: i32) -> StorefrontResult<()> {
    db.orders().mark_shipped(order_id)?;
    info!(order_id, "Order {} marked as shipped", Colored(Cyan, order_id));
    Ok(())
}

/// An order read from JSON, along with the `shipped` flag if the document
/// set one. Updates without it keep the stored shipping state.
pub struct OrderDocument {
    pub order: Order,
    pub shipped: Option<bool>,
}

pub fn read_order<R: Read>(mut reader: R) -> StorefrontResult<OrderDocument> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .with_context(|| "reading order document".to_string())?;

    let value: serde_json::Value = serde_json::from_str(&content)?;
    let shipped = value.get("shipped").and_then(serde_json::Value::as_bool);
    let order = serde_json::from_value(value)?;

    Ok(OrderDocument {
        order,
        shipped,
    })
}

fn address(order: &Order) -> String {
    [
        Some(order.line1.as_str()),
        order.line2.as_deref(),
        order.line3.as_deref(),
        Some(order.city.as_str()),
        Some(order.state.as_str()),
        order.zip.as_deref(),
        Some(order.country.as_str()),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(", ")
}

fn orders_table(orders: &Orders) -> String {
    let mut builder = Builder::new();
    builder.push_record(["ID", "Customer", "City", "Country", "Items", "Total", "Shipped"]);

    for order in orders {
        builder.push_record([
            order.order_id.to_string(),
            order.name.clone(),
            order.city.clone(),
            order.country.clone(),
            order.item_count().to_string(),
            format_price(order.total()),
            yes_no(order.shipped).to_string(),
        ]);
    }

    builder
        .build()
        .with(Panel::header("Orders"))
        .with(Style::rounded())
        .to_string()
}

fn order_table(order: &Order) -> String {
    let mut builder = Builder::new();
    builder.push_record(["Product", "Category", "Qty", "Price", "Subtotal"]);

    for line in &order.lines {
        builder.push_record([
            format!("{} (#{})", line.product.name, line.product.product_id),
            line.product.category.clone(),
            line.quantity.to_string(),
            format_price(line.product.price),
            format_price(line.subtotal()),
        ]);
    }

    builder.push_record([
        "Total".to_string(),
        String::new(),
        order.item_count().to_string(),
        String::new(),
        format_price(order.total()),
    ]);

    let header = format!(
        "Order {} | {} | {}{}{}",
        order.order_id,
        order.name,
        address(order),
        if order.gift_wrap { " | gift wrap" } else { "" },
        if order.shipped { " | shipped" } else { "" },
    );

    builder
        .build()
        .with(Panel::header(header))
        .with(Style::rounded())
        .to_string()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use storefront_db::{models::product::Product, repository::product::ProductRepository};

    use super::*;

    const CHECKOUT: &str = r#"{
        "name": "Joe Bloggs",
        "line1": "1 Main Street",
        "line2": "Apartment 4",
        "city": "Springfield",
        "state": "IL",
        "zip": "62701",
        "country": "USA",
        "gift_wrap": true,
        "lines": [{ "product": { "product_id": 1 }, "quantity": 2 }]
    }"#;

    fn db_with_kayak() -> DbConnection {
        let mut db = DbConnection::open_in_memory().unwrap();
        let mut kayak = Product {
            name: "Kayak".into(),
            description: "A boat for one person".into(),
            price: Decimal::new(27500, 2),
            category: "Watersports".into(),
            ..Default::default()
        };
        db.products().save_product(&mut kayak).unwrap();
        assert_eq!(kayak.product_id, 1);
        db
    }

    #[test]
    fn test_read_order() {
        let document = read_order(CHECKOUT.as_bytes()).unwrap();
        let order = document.order;

        assert_eq!(document.shipped, None);
        assert_eq!(order.order_id, OrderKey::New);
        assert_eq!(order.lines[0].product.product_id, 1);
        assert_eq!(order.lines[0].quantity, 2);
    }

    #[test]
    fn test_read_order_rejects_malformed_json() {
        let result = read_order("{ \"name\": ".as_bytes());
        assert!(matches!(result, Err(StorefrontError::Json(_))));
    }

    #[test]
    fn test_address_skips_missing_parts() {
        let order = read_order(CHECKOUT.as_bytes()).unwrap().order;
        assert_eq!(
            address(&order),
            "1 Main Street, Apartment 4, Springfield, IL, 62701, USA"
        );

        let order = Order {
            zip: None,
            line2: None,
            ..order
        };
        assert_eq!(address(&order), "1 Main Street, Springfield, IL, USA");
    }

    #[test]
    fn test_order_tables_render_loaded_lines() {
        let mut db = db_with_kayak();
        let mut order = read_order(CHECKOUT.as_bytes()).unwrap().order;
        db.orders().save_order(&mut order).unwrap();

        let orders = db.orders().orders().unwrap();
        let table = orders_table(&orders);
        assert!(table.contains("Joe Bloggs"));
        assert!(table.contains("$550.00"));

        let detail = order_table(orders.get(1).unwrap());
        assert!(detail.contains("Kayak (#1)"));
        assert!(detail.contains("$275.00"));
        assert!(detail.contains("gift wrap"));
    }

    #[test]
    fn test_show_missing_order() {
        let mut db = DbConnection::open_in_memory().unwrap();
        let result = show_order(&mut db, 42, false);
        assert!(matches!(result, Err(StorefrontError::OrderNotFound(42))));
    }

    #[test]
    fn test_save_missing_file() {
        let mut db = DbConnection::open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let result = save_order(&mut db, &path.to_string_lossy(), false);
        assert!(matches!(result, Err(StorefrontError::IoError { .. })));
    }

    #[test]
    fn test_save_order_from_file() {
        let mut db = db_with_kayak();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("order.json");
        std::fs::write(&path, CHECKOUT).unwrap();

        save_order(&mut db, &path.to_string_lossy(), false).unwrap();

        let orders = db.orders().orders().unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(db.products().products().unwrap().len(), 1);
    }

    #[test]
    fn test_update_without_shipped_keeps_stored_state() {
        let mut db = db_with_kayak();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("order.json");
        std::fs::write(&path, CHECKOUT).unwrap();
        save_order(&mut db, &path.to_string_lossy(), false).unwrap();
        ship_order(&mut db, 1).unwrap();

        let update = CHECKOUT.replacen("{", "{ \"order_id\": 1, ", 1);
        let update = update.replace("Springfield", "Shelbyville");
        std::fs::write(&path, &update).unwrap();
        save_order(&mut db, &path.to_string_lossy(), false).unwrap();

        let stored = db.orders().find(1).unwrap().unwrap();
        assert_eq!(stored.city, "Shelbyville");
        assert!(stored.shipped);

        let update = update.replacen("{", "{ \"shipped\": false, ", 1);
        std::fs::write(&path, &update).unwrap();
        save_order(&mut db, &path.to_string_lossy(), false).unwrap();

        assert!(!db.orders().find(1).unwrap().unwrap().shipped);
    }

    #[test]
    fn test_read_order_reports_explicit_shipped() {
        let json = CHECKOUT.replacen("{", "{ \"shipped\": true, ", 1);
        let document = read_order(json.as_bytes()).unwrap();
        assert_eq!(document.shipped, Some(true));
        assert!(document.order.shipped);
    }
}
