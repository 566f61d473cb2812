//! Diesel-backed unit of work for order creation.
//!
//! The handle owns a pooled connection with an open transaction on it. Writes
//! issued through the handle all land on that connection, so commit and
//! rollback cover the customer upsert, the order row, and the line items as
//! one atomic unit.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AnsiTransactionManager, RunQueryDsl, TransactionManager};
use uuid::Uuid;

use crate::domain::ports::{OrderUnitOfWork, StoreError};
use crate::domain::{Customer, CustomerDraft, NewOrder, Order};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    CustomerRow, CustomerUpdate, NewCustomerRow, NewOrderDishRow, NewOrderRow, OrderRow,
    row_to_customer, row_to_order,
};
use super::pool::{DbPool, OwnedConnection};
use super::schema::{customers, order_dishes, orders};

/// Open transaction over a dedicated pooled connection.
pub struct PgTransaction {
    conn: OwnedConnection,
}

/// Unit-of-work adapter over the shared connection pool.
#[derive(Clone)]
pub struct DieselOrderUnitOfWork {
    pool: DbPool,
}

impl DieselOrderUnitOfWork {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_row_error(error: crate::domain::order::UnknownVariant) -> StoreError {
    StoreError::query(error.to_string())
}

#[async_trait]
impl OrderUnitOfWork for DieselOrderUnitOfWork {
    type Handle = PgTransaction;

    async fn begin(&self) -> Result<Self::Handle, StoreError> {
        let mut conn = self.pool.get_owned().await.map_err(map_pool_error)?;
        AnsiTransactionManager::begin_transaction(&mut *conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(PgTransaction { conn })
    }

    async fn upsert_customer(
        &self,
        tx: &mut Self::Handle,
        draft: &CustomerDraft,
    ) -> Result<Customer, StoreError> {
        let row = NewCustomerRow {
            id: Uuid::new_v4(),
            phone: draft.phone(),
            name: draft.name(),
            address: draft.address(),
            preferred_payment: draft.preferred_payment().as_str(),
            preferred_order: draft.preferred_order().as_str(),
        };
        let update = CustomerUpdate {
            name: draft.name(),
            address: draft.address(),
            preferred_payment: draft.preferred_payment().as_str(),
            preferred_order: draft.preferred_order().as_str(),
            updated_at: Utc::now(),
        };

        // The unique index on phone closes the lookup-then-insert race: two
        // concurrent first orders from the same number converge on one row.
        let stored: CustomerRow = diesel::insert_into(customers::table)
            .values(&row)
            .on_conflict(customers::phone)
            .do_update()
            .set(&update)
            .returning(CustomerRow::as_returning())
            .get_result(&mut *tx.conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_customer(stored).map_err(map_row_error)
    }

    async fn insert_order(
        &self,
        tx: &mut Self::Handle,
        order: &NewOrder,
    ) -> Result<Order, StoreError> {
        let row = NewOrderRow {
            id: Uuid::new_v4(),
            status: order.status.as_str(),
            order_type: order.order_type.as_str(),
            payment_method: order.payment_method.as_str(),
            price: order.price,
            comment: order.comment.as_deref(),
            address: order.address.as_deref(),
            customer_id: order.customer_id,
        };

        let stored: OrderRow = diesel::insert_into(orders::table)
            .values(&row)
            .returning(OrderRow::as_returning())
            .get_result(&mut *tx.conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_order(stored).map_err(map_row_error)
    }

    async fn insert_line_items(
        &self,
        tx: &mut Self::Handle,
        order_id: Uuid,
        dish_ids: &[Uuid],
    ) -> Result<(), StoreError> {
        let rows: Vec<NewOrderDishRow> = dish_ids
            .iter()
            .map(|dish_id| NewOrderDishRow {
                order_id,
                dish_id: *dish_id,
            })
            .collect();

        diesel::insert_into(order_dishes::table)
            .values(&rows)
            .execute(&mut *tx.conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn commit(&self, mut tx: Self::Handle) -> Result<(), StoreError> {
        AnsiTransactionManager::commit_transaction(&mut *tx.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn rollback(&self, mut tx: Self::Handle) -> Result<(), StoreError> {
        AnsiTransactionManager::rollback_transaction(&mut *tx.conn)
            .await
            .map_err(map_diesel_error)
    }
}
