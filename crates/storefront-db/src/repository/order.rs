//! Order aggregate persistence.
//!
//! Reads resolve every order together with its lines and their products in
//! a single joined query. Writes only ever touch `orders` and `order_lines`:
//! products on the lines are referenced by id and are never inserted.

use std::collections::BTreeSet;

use diesel::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::{
    error::{DbError, Result},
    models::{
        order::{NewOrderLine, Order, OrderChanges, OrderKey, OrderLine, OrderLineRow, OrderRow},
        product::Product,
    },
    schema::{order_lines, orders, products},
};

/// The order-repository capability exposed to request handlers.
pub trait OrderRepository {
    /// All stored orders with lines and products populated.
    fn orders(&mut self) -> Result<Orders>;

    /// Inserts a new order or updates an existing one, depending on its
    /// [`OrderKey`]. A new order gets its generated id written back.
    fn save_order(&mut self, order: &mut Order) -> Result<()>;
}

/// Fully loaded orders, iterable any number of times.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Orders(Vec<Order>);

impl Orders {
    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, order_id: i32) -> Option<&Order> {
        self.0
            .iter()
            .find(|order| order.order_id == OrderKey::Existing(order_id))
    }

    pub fn into_vec(self) -> Vec<Order> {
        self.0
    }
}

impl IntoIterator for Orders {
    type Item = Order;
    type IntoIter = std::vec::IntoIter<Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Orders {
    type Item = &'a Order;
    type IntoIter = std::slice::Iter<'a, Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Filters for listing orders. The default selects everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderQuery {
    pub order_id: Option<i32>,
    pub shipped: Option<bool>,
    pub limit: Option<i64>,
}

impl OrderQuery {
    pub fn unshipped() -> Self {
        Self {
            shipped: Some(false),
            ..Default::default()
        }
    }
}

/// [`OrderRepository`] over a borrowed diesel session.
///
/// The store holds no state of its own; the caller owns the connection and
/// its lifetime bounds one unit of work.
pub struct OrderStore<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> OrderStore<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Lists orders matching `query`, ascending by order id.
    ///
    /// Lines and products come back in the same joined statement. A limit
    /// counts orders rather than joined rows, so it first narrows the set of
    /// order ids.
    pub fn query(&mut self, query: &OrderQuery) -> Result<Orders> {
        let mut joined = orders::table
            .left_join(order_lines::table.inner_join(products::table))
            .into_boxed();

        if let Some(id) = query.order_id {
            joined = joined.filter(orders::order_id.eq(id));
        }
        if let Some(shipped) = query.shipped {
            joined = joined.filter(orders::shipped.eq(shipped));
        }
        if let Some(limit) = query.limit {
            let ids = self.limited_ids(query, limit)?;
            joined = joined.filter(orders::order_id.eq_any(ids));
        }

        let rows: Vec<(OrderRow, Option<OrderLineRow>, Option<Product>)> = joined
            .order((orders::order_id.asc(), order_lines::order_line_id.asc()))
            .select((
                OrderRow::as_select(),
                Option::<OrderLineRow>::as_select(),
                Option::<Product>::as_select(),
            ))
            .load(&mut *self.conn)?;

        let orders = assemble(rows);
        debug!(count = orders.len(), query = ?query, "loaded orders");
        Ok(Orders(orders))
    }

    fn limited_ids(&mut self, query: &OrderQuery, limit: i64) -> Result<Vec<i32>> {
        let mut ids = orders::table.select(orders::order_id).into_boxed();

        if let Some(id) = query.order_id {
            ids = ids.filter(orders::order_id.eq(id));
        }
        if let Some(shipped) = query.shipped {
            ids = ids.filter(orders::shipped.eq(shipped));
        }

        Ok(ids
            .order(orders::order_id.asc())
            .limit(limit)
            .load(&mut *self.conn)?)
    }

    /// Finds a single order with its lines and products.
    pub fn find(&mut self, order_id: i32) -> Result<Option<Order>> {
        let orders = self.query(&OrderQuery {
            order_id: Some(order_id),
            ..Default::default()
        })?;
        Ok(orders.into_iter().next())
    }

    /// Counts stored orders.
    pub fn count(&mut self) -> Result<i64> {
        Ok(orders::table.count().get_result(&mut *self.conn)?)
    }

    /// Flags an existing order as shipped.
    pub fn mark_shipped(&mut self, order_id: i32) -> Result<()> {
        let updated = diesel::update(orders::table.find(order_id))
            .set(orders::shipped.eq(true))
            .execute(&mut *self.conn)?;

        if updated == 0 {
            return Err(DbError::NotFound(format!("order {order_id}")));
        }

        debug!(order_id, "order marked as shipped");
        Ok(())
    }
}

impl OrderRepository for OrderStore<'_> {
    fn orders(&mut self) -> Result<Orders> {
        self.query(&OrderQuery::default())
    }

    fn save_order(&mut self, order: &mut Order) -> Result<()> {
        let product_ids = attach_products(order)?;
        debug!(
            order_id = %order.order_id,
            products = ?product_ids,
            lines = order.lines.len(),
            "saving order"
        );

        let current: &Order = order;
        let (order_id, line_ids) = self.conn.transaction::<_, DbError, _>(|conn| {
            let order_id = match current.order_id {
                OrderKey::New => diesel::insert_into(orders::table)
                    .values(OrderChanges::from(current))
                    .returning(orders::order_id)
                    .get_result::<i32>(conn)?,
                OrderKey::Existing(id) => {
                    let updated = diesel::update(orders::table.find(id))
                        .set(OrderChanges::from(current))
                        .execute(conn)?;
                    if updated == 0 {
                        return Err(DbError::NotFound(format!("order {id}")));
                    }

                    diesel::delete(order_lines::table.filter(order_lines::order_id.eq(id)))
                        .execute(conn)?;
                    id
                }
            };

            let mut line_ids = Vec::with_capacity(current.lines.len());
            for line in &current.lines {
                let line_id = diesel::insert_into(order_lines::table)
                    .values(NewOrderLine {
                        order_id,
                        product_id: line.product.product_id,
                        quantity: line.quantity,
                    })
                    .returning(order_lines::order_line_id)
                    .get_result::<i32>(conn)?;
                line_ids.push(line_id);
            }

            Ok((order_id, line_ids))
        })?;

        order.order_id = OrderKey::Existing(order_id);
        for (line, line_id) in order.lines.iter_mut().zip(line_ids) {
            line.order_line_id = line_id;
        }

        debug!(order_id, "order saved");
        Ok(())
    }
}

/// Collects the product ids referenced by the order's lines. These rows
/// already exist; saving only writes the association to them.
fn attach_products(order: &Order) -> Result<BTreeSet<i32>> {
    order
        .lines
        .iter()
        .map(|line| {
            if line.product.is_new() {
                Err(DbError::UnsavedProduct(line.product.name.clone()))
            } else {
                Ok(line.product.product_id)
            }
        })
        .collect()
}

/// Folds joined rows, sorted by order id, into order aggregates.
fn assemble(rows: Vec<(OrderRow, Option<OrderLineRow>, Option<Product>)>) -> Vec<Order> {
    let mut orders: Vec<Order> = Vec::new();

    for (row, line, product) in rows {
        let key = OrderKey::Existing(row.order_id);
        if orders.last().map(|order| order.order_id) != Some(key) {
            orders.push(row.into());
        }

        if let (Some(line), Some(product), Some(order)) = (line, product, orders.last_mut()) {
            order.lines.push(OrderLine {
                order_line_id: line.order_line_id,
                product,
                quantity: line.quantity,
            });
        }
    }

    orders
}
