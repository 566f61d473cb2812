//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` so they depend only on
//! domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{DishCatalog, OrdersCommand, OrdersQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub orders: Arc<dyn OrdersCommand>,
    pub orders_query: Arc<dyn OrdersQuery>,
    pub catalog: Arc<dyn DishCatalog>,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    pub fn new(
        orders: Arc<dyn OrdersCommand>,
        orders_query: Arc<dyn OrdersQuery>,
        catalog: Arc<dyn DishCatalog>,
    ) -> Self {
        Self {
            orders,
            orders_query,
            catalog,
        }
    }
}
