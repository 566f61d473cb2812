//! HTTP inbound adapter exposing the REST surface.

use actix_web::web;

pub mod error;
pub mod health;
pub mod orders;
pub mod state;

pub use error::{ApiError, ApiResult};

/// Register every `/api/v1` endpoint on the given service config.
///
/// Literal routes are registered ahead of the `{id}` matcher so paths such
/// as `/orders/search` never reach the UUID extractor.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(crate::doc::openapi_json)
        .service(orders::search_orders)
        .service(orders::count_active_orders)
        .service(orders::list_orders)
        .service(orders::create_order)
        .service(orders::change_order_status)
        .service(orders::get_order);
}
