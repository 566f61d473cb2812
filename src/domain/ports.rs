//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports describe how the domain expects to reach infrastructure
//! (store, catalog, broadcast transport); driving ports are the use-cases
//! inbound adapters depend on. Each trait exposes typed errors so adapters
//! map their failures into predictable variants.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::customer::{Customer, CustomerDraft};
use super::dish::Dish;
use super::error::Error;
use super::order::{
    NewOrder, Order, OrderStatus, OrderStatusChanged, OrderType, OrderView, PaymentMethod,
};

/// Errors surfaced by storage adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Connection could not be established or was lost.
    #[error("store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("store query failed: {message}")]
    Query { message: String },
}

impl StoreError {
    /// Helper for connection-oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Transactional unit of work spanning the customer and order tables.
///
/// [`begin`](Self::begin) opens a transaction and hands back an explicit
/// handle; every write that must share the transaction takes the handle as an
/// argument. Ownership of commit/rollback stays with whoever opened the
/// handle — in this crate that is only
/// [`OrderService::create_order`](super::OrderService), the sole
/// multi-statement write path in the system.
#[async_trait]
pub trait OrderUnitOfWork: Send + Sync {
    /// Open transaction handle.
    type Handle: Send;

    /// Begin a transaction.
    async fn begin(&self) -> Result<Self::Handle, StoreError>;

    /// Insert-or-update a customer keyed by phone number and return the
    /// canonical row. Updates are last-write-wins over name, address, and
    /// preferences.
    async fn upsert_customer(
        &self,
        tx: &mut Self::Handle,
        draft: &CustomerDraft,
    ) -> Result<Customer, StoreError>;

    /// Insert a new order row and return it with its generated identifiers.
    async fn insert_order(
        &self,
        tx: &mut Self::Handle,
        order: &NewOrder,
    ) -> Result<Order, StoreError>;

    /// Insert one association row per dish id, duplicates preserved.
    async fn insert_line_items(
        &self,
        tx: &mut Self::Handle,
        order_id: Uuid,
        dish_ids: &[Uuid],
    ) -> Result<(), StoreError>;

    /// Make every write on the handle durably visible at once.
    async fn commit(&self, tx: Self::Handle) -> Result<(), StoreError>;

    /// Discard every write on the handle.
    async fn rollback(&self, tx: Self::Handle) -> Result<(), StoreError>;
}

/// Page selector for order listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderPage {
    pub limit: i64,
    pub offset: i64,
    /// When set, exclude orders in terminal states.
    pub only_active: bool,
}

/// Read side and single-row status write for orders.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Fetch one fully materialised order view.
    async fn find_view_by_id(&self, order_id: Uuid) -> Result<Option<OrderView>, StoreError>;

    /// Newest-first page of order views.
    async fn list_views(&self, page: OrderPage) -> Result<Vec<OrderView>, StoreError>;

    /// Orders whose sequential number starts with the given digit prefix.
    async fn search_views_by_number_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<OrderView>, StoreError>;

    /// Persist a new status on the order row. Single-row write, no
    /// transaction required.
    async fn update_status(&self, order_id: Uuid, status: OrderStatus) -> Result<(), StoreError>;

    /// Count orders outside terminal states.
    async fn count_active(&self) -> Result<u64, StoreError>;
}

/// Catalog collaborator resolving dish ids to dish records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DishCatalog: Send + Sync {
    /// Resolve the given ids, soft-deleted rows included so callers can
    /// report unavailable dishes distinctly from unknown ones. Image paths
    /// come back resolved against the configured asset base.
    async fn get_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Dish>, StoreError>;
}

/// Fire-and-forget broadcast of status-change events.
///
/// Delivery is best-effort and at-most-once; listeners connected after a
/// broadcast never see it and failures never block the status change itself.
#[cfg_attr(test, mockall::automock)]
pub trait StatusNotifier: Send + Sync {
    fn notify(&self, event: OrderStatusChanged);
}

/// Validated input for order creation.
///
/// The inbound adapter resolves and validates the dish list before building
/// this request; the coordinator trusts it and preserves duplicate dishes as
/// separate line items.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrderRequest {
    pub customer: CustomerDraft,
    pub dishes: Vec<Dish>,
    pub order_type: OrderType,
    pub payment_method: PaymentMethod,
    pub comment: Option<String>,
    pub address: Option<String>,
}

/// Order mutations exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrdersCommand: Send + Sync {
    /// Atomically create an order with its customer and line items.
    async fn create_order(&self, request: CreateOrderRequest) -> Result<OrderView, Error>;

    /// Validate and apply a status transition, then broadcast it.
    async fn change_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<OrderView, Error>;
}

/// Order reads exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrdersQuery: Send + Sync {
    async fn get_order(&self, order_id: Uuid) -> Result<OrderView, Error>;

    async fn list_orders(&self, page: OrderPage) -> Result<Vec<OrderView>, Error>;

    async fn search_orders(&self, term: &str) -> Result<Vec<OrderView>, Error>;

    async fn count_active(&self) -> Result<u64, Error>;
}
