//! Order lifecycle services: transactional creation and status transitions.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;
use uuid::Uuid;

use super::customer::Customer;
use super::error::Error;
use super::order::{NewOrder, Order, OrderStatus, OrderStatusChanged, OrderView, status_allowed_for};
use super::ports::{
    CreateOrderRequest, OrderPage, OrderRepository, OrderUnitOfWork, OrdersCommand, OrdersQuery,
    StatusNotifier, StoreError,
};
use super::pricing;

/// Error message surfaced for any failure inside the create-order
/// transaction; the underlying cause is logged, never exposed.
const ORDER_CREATION_FAILED: &str = "order creation failed";

fn map_store_error(error: StoreError) -> Error {
    match error {
        StoreError::Connection { message } => {
            Error::service_unavailable(format!("order store unavailable: {message}"))
        }
        StoreError::Query { message } => Error::internal(format!("order store error: {message}")),
    }
}

/// Order service implementing the command and query driving ports.
///
/// `create_order` is the only place in the system that opens a unit-of-work
/// handle spanning more than one table; `change_status` hosts the status
/// machine and triggers the notifier.
#[derive(Clone)]
pub struct OrderService<U, R, N> {
    unit_of_work: Arc<U>,
    orders: Arc<R>,
    notifier: Arc<N>,
}

impl<U, R, N> OrderService<U, R, N> {
    /// Create a service over the given driven ports.
    pub fn new(unit_of_work: Arc<U>, orders: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            unit_of_work,
            orders,
            notifier,
        }
    }
}

impl<U, R, N> OrderService<U, R, N>
where
    U: OrderUnitOfWork,
    R: OrderRepository,
    N: StatusNotifier,
{
    async fn create_within(
        &self,
        tx: &mut U::Handle,
        request: &CreateOrderRequest,
    ) -> Result<(Order, Customer), StoreError> {
        let customer = self
            .unit_of_work
            .upsert_customer(tx, &request.customer)
            .await?;

        let order = self
            .unit_of_work
            .insert_order(
                tx,
                &NewOrder {
                    status: OrderStatus::Created,
                    order_type: request.order_type,
                    payment_method: request.payment_method,
                    price: pricing::order_total(request.dishes.iter().map(|dish| dish.price)),
                    comment: request.comment.clone(),
                    address: request.address.clone(),
                    customer_id: customer.id,
                },
            )
            .await?;

        let dish_ids: Vec<Uuid> = request.dishes.iter().map(|dish| dish.id).collect();
        self.unit_of_work
            .insert_line_items(tx, order.id, &dish_ids)
            .await?;

        Ok((order, customer))
    }
}

#[async_trait]
impl<U, R, N> OrdersCommand for OrderService<U, R, N>
where
    U: OrderUnitOfWork,
    R: OrderRepository,
    N: StatusNotifier,
{
    async fn create_order(&self, request: CreateOrderRequest) -> Result<OrderView, Error> {
        if request.dishes.is_empty() {
            return Err(Error::invalid_request("order must contain at least one dish"));
        }

        let mut tx = self.unit_of_work.begin().await.map_err(|cause| {
            error!(error = %cause, "failed to open order transaction");
            Error::internal(ORDER_CREATION_FAILED)
        })?;

        match self.create_within(&mut tx, &request).await {
            Ok((order, customer)) => {
                self.unit_of_work.commit(tx).await.map_err(|cause| {
                    error!(error = %cause, "failed to commit order transaction");
                    Error::internal(ORDER_CREATION_FAILED)
                })?;

                Ok(OrderView {
                    order,
                    customer,
                    dishes: request.dishes,
                })
            }
            Err(cause) => {
                error!(error = %cause, "order creation failed; rolling back");
                if let Err(rollback_error) = self.unit_of_work.rollback(tx).await {
                    error!(error = %rollback_error, "order transaction rollback failed");
                }
                Err(Error::internal(ORDER_CREATION_FAILED))
            }
        }
    }

    async fn change_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<OrderView, Error> {
        let mut view = self
            .orders
            .find_view_by_id(order_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("order {order_id} not found")))?;

        if view.order.status.is_terminal() {
            return Err(Error::invalid_request(format!(
                "order is already {} and accepts no further changes",
                view.order.status
            )));
        }
        if !status_allowed_for(view.order.order_type, status) {
            return Err(Error::invalid_request(
                "status is incompatible with this order",
            ));
        }

        self.orders
            .update_status(order_id, status)
            .await
            .map_err(map_store_error)?;
        view.order.status = status;

        self.notifier.notify(OrderStatusChanged {
            order_id: view.order.id,
            order_number: view.order.order_number,
            status,
        });

        Ok(view)
    }
}

#[async_trait]
impl<U, R, N> OrdersQuery for OrderService<U, R, N>
where
    U: OrderUnitOfWork,
    R: OrderRepository,
    N: StatusNotifier,
{
    async fn get_order(&self, order_id: Uuid) -> Result<OrderView, Error> {
        self.orders
            .find_view_by_id(order_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("order {order_id} not found")))
    }

    async fn list_orders(&self, page: OrderPage) -> Result<Vec<OrderView>, Error> {
        self.orders.list_views(page).await.map_err(map_store_error)
    }

    async fn search_orders(&self, term: &str) -> Result<Vec<OrderView>, Error> {
        let prefix: String = term
            .trim()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        if prefix.is_empty() {
            return Ok(Vec::new());
        }

        self.orders
            .search_views_by_number_prefix(&prefix)
            .await
            .map_err(map_store_error)
    }

    async fn count_active(&self) -> Result<u64, Error> {
        self.orders.count_active().await.map_err(map_store_error)
    }
}

#[cfg(test)]
#[path = "order_service_tests.rs"]
mod tests;
