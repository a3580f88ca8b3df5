//! Catalog product repository.

use diesel::prelude::*;
use tracing::debug;

use crate::{
    error::{DbError, Result},
    models::product::{NewProduct, Product},
    schema::products,
};

/// The catalog capability used by the admin side of the storefront.
pub trait ProductRepository {
    /// All products, ascending by id.
    fn products(&mut self) -> Result<Vec<Product>>;

    /// Inserts the product when it has no id yet, otherwise updates it.
    fn save_product(&mut self, product: &mut Product) -> Result<()>;

    /// Deletes a product and returns it.
    fn delete_product(&mut self, product_id: i32) -> Result<Product>;
}

/// [`ProductRepository`] over a borrowed diesel session.
pub struct ProductStore<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> ProductStore<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Finds a product by ID.
    pub fn find(&mut self, product_id: i32) -> Result<Option<Product>> {
        Ok(products::table
            .find(product_id)
            .select(Product::as_select())
            .first(&mut *self.conn)
            .optional()?)
    }

    /// Lists products in a category.
    pub fn by_category(&mut self, category: &str) -> Result<Vec<Product>> {
        Ok(products::table
            .filter(products::category.eq(category))
            .order(products::product_id.asc())
            .select(Product::as_select())
            .load(&mut *self.conn)?)
    }
}

impl ProductRepository for ProductStore<'_> {
    fn products(&mut self) -> Result<Vec<Product>> {
        Ok(products::table
            .order(products::product_id.asc())
            .select(Product::as_select())
            .load(&mut *self.conn)?)
    }

    fn save_product(&mut self, product: &mut Product) -> Result<()> {
        if product.is_new() {
            product.product_id = diesel::insert_into(products::table)
                .values(NewProduct::from(&*product))
                .returning(products::product_id)
                .get_result(&mut *self.conn)?;
            debug!(product_id = product.product_id, name = %product.name, "product created");
            return Ok(());
        }

        let updated = diesel::update(products::table.find(product.product_id))
            .set(NewProduct::from(&*product))
            .execute(&mut *self.conn)?;
        if updated == 0 {
            return Err(DbError::NotFound(format!("product {}", product.product_id)));
        }

        debug!(product_id = product.product_id, "product updated");
        Ok(())
    }

    fn delete_product(&mut self, product_id: i32) -> Result<Product> {
        let Some(product) = self.find(product_id)? else {
            return Err(DbError::NotFound(format!("product {product_id}")));
        };

        diesel::delete(products::table.find(product_id)).execute(&mut *self.conn)?;
        debug!(product_id, "product deleted");
        Ok(product)
    }
}
