//! Diesel-backed order reads and the single-row status write.
//!
//! View assembly batches its SELECTs inside one transaction so every view in
//! a page observes a consistent MVCC snapshot even while orders are being
//! created concurrently.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Text};
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{OrderPage, OrderRepository, StoreError};
use crate::domain::{OrderStatus, OrderView};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CustomerRow, DishRow, OrderRow, row_to_customer, row_to_dish, row_to_order};
use super::pool::DbPool;
use super::schema::{customers, dishes, order_dishes, orders};

/// Storage text of the absorbing statuses, excluded by active filters.
const TERMINAL_STATUSES: [&str; 2] = ["completed", "cancelled"];

type ViewRows = (Vec<OrderRow>, Vec<CustomerRow>, Vec<(Uuid, DishRow)>);

/// Diesel-backed [`OrderRepository`] implementation.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
    asset_base: String,
}

impl DieselOrderRepository {
    /// Create a repository reading through the shared pool; `asset_base`
    /// roots stored dish image filenames into servable paths.
    pub fn new(pool: DbPool, asset_base: impl Into<String>) -> Self {
        Self {
            pool,
            asset_base: asset_base.into(),
        }
    }

    /// Load the customers and line items for the given order rows within the
    /// caller's transaction.
    async fn load_related(
        conn: &mut AsyncPgConnection,
        order_rows: Vec<OrderRow>,
    ) -> Result<ViewRows, diesel::result::Error> {
        let customer_ids: Vec<Uuid> = order_rows.iter().map(|row| row.customer_id).collect();
        let order_ids: Vec<Uuid> = order_rows.iter().map(|row| row.id).collect();

        let customer_rows: Vec<CustomerRow> = customers::table
            .filter(customers::id.eq_any(&customer_ids))
            .select(CustomerRow::as_select())
            .load(conn)
            .await?;

        let line_items: Vec<(Uuid, DishRow)> = order_dishes::table
            .inner_join(dishes::table)
            .filter(order_dishes::order_id.eq_any(&order_ids))
            .order_by(order_dishes::id)
            .select((order_dishes::order_id, DishRow::as_select()))
            .load(conn)
            .await?;

        Ok((order_rows, customer_rows, line_items))
    }

    fn assemble_views(&self, rows: ViewRows) -> Result<Vec<OrderView>, StoreError> {
        let (order_rows, customer_rows, line_items) = rows;

        let mut customers_by_id = HashMap::with_capacity(customer_rows.len());
        for row in customer_rows {
            let customer = row_to_customer(row).map_err(|e| StoreError::query(e.to_string()))?;
            customers_by_id.insert(customer.id, customer);
        }

        let mut dishes_by_order: HashMap<Uuid, Vec<_>> = HashMap::new();
        for (order_id, dish_row) in line_items {
            dishes_by_order
                .entry(order_id)
                .or_default()
                .push(row_to_dish(dish_row, &self.asset_base));
        }

        order_rows
            .into_iter()
            .map(|row| {
                let order = row_to_order(row).map_err(|e| StoreError::query(e.to_string()))?;
                let customer = customers_by_id
                    .get(&order.customer_id)
                    .cloned()
                    .ok_or_else(|| StoreError::query("order row without customer"))?;
                let dishes = dishes_by_order.remove(&order.id).unwrap_or_default();
                Ok(OrderView {
                    order,
                    customer,
                    dishes,
                })
            })
            .collect()
    }
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn find_view_by_id(&self, order_id: Uuid) -> Result<Option<OrderView>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = conn
            .transaction(|conn| {
                async move {
                    let order_rows: Vec<OrderRow> = orders::table
                        .filter(orders::id.eq(order_id))
                        .select(OrderRow::as_select())
                        .load(conn)
                        .await?;
                    Self::load_related(conn, order_rows).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(self.assemble_views(rows)?.into_iter().next())
    }

    async fn list_views(&self, page: OrderPage) -> Result<Vec<OrderView>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = conn
            .transaction(|conn| {
                async move {
                    let mut query = orders::table
                        .order_by(orders::order_number.desc())
                        .limit(page.limit)
                        .offset(page.offset)
                        .select(OrderRow::as_select())
                        .into_boxed();
                    if page.only_active {
                        query = query.filter(orders::status.ne_all(TERMINAL_STATUSES));
                    }
                    let order_rows: Vec<OrderRow> = query.load(conn).await?;
                    Self::load_related(conn, order_rows).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        self.assemble_views(rows)
    }

    async fn search_views_by_number_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<OrderView>, StoreError> {
        let pattern = format!("{prefix}%");
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = conn
            .transaction(|conn| {
                async move {
                    let order_rows: Vec<OrderRow> = orders::table
                        .filter(sql::<Bool>("order_number::TEXT LIKE ").bind::<Text, _>(pattern))
                        .order_by(orders::order_number.desc())
                        .select(OrderRow::as_select())
                        .load(conn)
                        .await?;
                    Self::load_related(conn, order_rows).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        self.assemble_views(rows)
    }

    async fn update_status(&self, order_id: Uuid, status: OrderStatus) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(orders::table.find(order_id))
            .set((
                orders::status.eq(status.as_str()),
                orders::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(StoreError::query("order row vanished during update"));
        }
        Ok(())
    }

    async fn count_active(&self) -> Result<u64, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = orders::table
            .filter(orders::status.ne_all(TERMINAL_STATUSES))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}
