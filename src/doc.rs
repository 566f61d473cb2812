//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API, and the handler serving it as JSON. The document covers
//! every order endpoint plus the health probes.

use actix_web::{get, web};
use utoipa::OpenApi;

use crate::domain::{ErrorCode, OrderStatus, OrderType, PaymentMethod};
use crate::inbound::http::error::ApiError;
use crate::inbound::http::orders::{
    ActiveCountBody, ChangeStatusBody, CreateOrderBody, CustomerBody, CustomerViewBody,
    DishViewBody, OrderViewBody,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bistro backend API",
        description = "Back-office order intake, status tracking, and live status broadcasts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::orders::create_order,
        crate::inbound::http::orders::change_order_status,
        crate::inbound::http::orders::list_orders,
        crate::inbound::http::orders::search_orders,
        crate::inbound::http::orders::count_active_orders,
        crate::inbound::http::orders::get_order,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ApiError,
        ErrorCode,
        CreateOrderBody,
        CustomerBody,
        ChangeStatusBody,
        OrderViewBody,
        CustomerViewBody,
        DishViewBody,
        ActiveCountBody,
        OrderStatus,
        OrderType,
        PaymentMethod,
    )),
    tags(
        (name = "orders", description = "Order intake and lifecycle"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

/// Serve the generated specification.
#[get("/openapi.json")]
pub async fn openapi_json() -> web::Json<utoipa::openapi::OpenApi> {
    web::Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn document_lists_every_order_endpoint() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/v1/orders",
            "/api/v1/orders/{id}/status",
            "/api/v1/orders/search",
            "/api/v1/orders/count/active",
            "/api/v1/orders/{id}",
            "/healthz",
            "/readyz",
        ] {
            assert!(paths.contains_key(path), "missing path {path}");
        }
    }

    #[rstest]
    fn document_serialises_to_json() {
        let json = ApiDoc::openapi().to_json().expect("serialises");
        assert!(json.contains("Bistro backend API"));
        assert!(json.contains("createOrder"));
        assert!(json.contains("changeOrderStatus"));
    }
}
