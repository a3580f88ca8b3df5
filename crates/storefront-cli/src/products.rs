use nu_ansi_term::Color::{Blue, Cyan, Green, Red};
use rust_decimal::Decimal;
use storefront_db::{
    connection::DbConnection, models::product::Product, repository::product::ProductRepository,
};
use tabled::{
    builder::Builder,
    settings::{Panel, Style},
};
use tracing::{debug, info};

use crate::{
    error::StorefrontResult,
    utils::{format_price, print_json, Colored},
};

pub fn list_products(
    db: &mut DbConnection,
    category: Option<String>,
    json: bool,
) -> StorefrontResult<()> {
    debug!(category = ?category, "listing products");

    let products = match category {
        Some(ref category) => db.products().by_category(category)?,
        None => db.products().products()?,
    };

    if json {
        return print_json(&products);
    }

    if products.is_empty() {
        info!("No products found");
        return Ok(());
    }

    info!("\n{}", products_table(&products));
    Ok(())
}

pub fn add_product(
    db: &mut DbConnection,
    name: String,
    price: Decimal,
    category: String,
    description: String,
    json: bool,
) -> StorefrontResult<()> {
    let mut product = Product {
        product_id: 0,
        name,
        description,
        price,
        category,
    };
    db.products().save_product(&mut product)?;

    if json {
        return print_json(&product);
    }

    info!(
        product_id = product.product_id,
        "Added {} #{} at {}",
        Colored(Blue, &product.name),
        Colored(Cyan, product.product_id),
        Colored(Green, format_price(product.price))
    );
    Ok(())
}

pub fn remove_product(db: &mut DbConnection, product_id: i32) -> StorefrontResult<()> {
    let product = db.products().delete_product(product_id)?;
    info!(
        product_id,
        "Removed {} #{}",
        Colored(Red, &product.name),
        Colored(Cyan, product_id)
    );
    Ok(())
}

fn products_table(products: &[Product]) -> String {
    let mut builder = Builder::new();
    builder.push_record(["ID", "Name", "Category", "Price", "Description"]);

    for product in products {
        builder.push_record([
            product.product_id.to_string(),
            product.name.clone(),
            product.category.clone(),
            format_price(product.price),
            product.description.clone(),
        ]);
    }

    builder
        .build()
        .with(Panel::header("Products"))
        .with(Style::rounded())
        .to_string()
}

#[cfg(test)]
mod tests {
    use storefront_db::DbError;

    use super::*;
    use crate::error::StorefrontError;

    #[test]
    fn test_add_list_remove() {
        let mut db = DbConnection::open_in_memory().unwrap();

        add_product(
            &mut db,
            "Lifejacket".into(),
            Decimal::new(4895, 2),
            "Watersports".into(),
            String::new(),
            false,
        )
        .unwrap();

        let products = db.products().products().unwrap();
        assert_eq!(products.len(), 1);
        assert!(products_table(&products).contains("$48.95"));

        remove_product(&mut db, products[0].product_id).unwrap();
        assert!(db.products().products().unwrap().is_empty());
    }

    #[test]
    fn test_remove_missing_product() {
        let mut db = DbConnection::open_in_memory().unwrap();

        let result = remove_product(&mut db, 9);
        assert!(matches!(
            result,
            Err(StorefrontError::Database(DbError::NotFound(_)))
        ));
    }
}
