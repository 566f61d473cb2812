//! Order HTTP handlers.
//!
//! ```text
//! POST /api/v1/orders
//! PUT  /api/v1/orders/{id}/status
//! GET  /api/v1/orders
//! GET  /api/v1/orders/search
//! GET  /api/v1/orders/count/active
//! GET  /api/v1/orders/{id}
//! ```
//!
//! Creation preconditions live here, not in the coordinator: dish ids are
//! resolved through the catalog port and rejected when unknown or
//! unavailable, and a delivery order must carry an address.

use std::collections::HashMap;

use actix_web::{get, post, put, web};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::ports::{CreateOrderRequest, OrderPage};
use crate::domain::{
    CustomerDraft, Dish, Error, OrderStatus, OrderType, OrderView, PaymentMethod,
};
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::state::HttpState;

/// Listing page size used when the query omits `limit`.
const DEFAULT_PAGE_LIMIT: i64 = 50;
/// Upper bound on the listing page size.
const MAX_PAGE_LIMIT: i64 = 100;

/// Customer block of an order creation request.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerBody {
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
    pub order_type: OrderType,
    pub payment_method: PaymentMethod,
}

/// Request payload for creating an order.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderBody {
    pub customer: CustomerBody,
    /// Dish ids; duplicates are kept as separate line items.
    pub dishes: Vec<Uuid>,
    pub comment: Option<String>,
}

/// Request payload for a status transition.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ChangeStatusBody {
    pub status: OrderStatus,
}

/// Customer block of an order view response.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerViewBody {
    pub id: Uuid,
    pub customer_number: i64,
    pub phone: String,
    pub name: String,
    pub address: Option<String>,
    pub preferred_payment: PaymentMethod,
    pub preferred_order: OrderType,
}

/// Dish block of an order view response.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DishViewBody {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Order view response payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderViewBody {
    pub id: Uuid,
    pub order_number: i64,
    pub status: OrderStatus,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub payment_method: PaymentMethod,
    pub price: Decimal,
    pub comment: Option<String>,
    pub address: Option<String>,
    pub customer: CustomerViewBody,
    pub dishes: Vec<DishViewBody>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderView> for OrderViewBody {
    fn from(view: OrderView) -> Self {
        let OrderView {
            order,
            customer,
            dishes,
        } = view;
        Self {
            id: order.id,
            order_number: order.order_number,
            status: order.status,
            order_type: order.order_type,
            payment_method: order.payment_method,
            price: order.price,
            comment: order.comment,
            address: order.address,
            customer: CustomerViewBody {
                id: customer.id,
                customer_number: customer.customer_number,
                phone: customer.phone,
                name: customer.name,
                address: customer.address,
                preferred_payment: customer.preferred_payment,
                preferred_order: customer.preferred_order,
            },
            dishes: dishes.into_iter().map(DishViewBody::from).collect(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

impl From<Dish> for DishViewBody {
    fn from(dish: Dish) -> Self {
        Self {
            id: dish.id,
            name: dish.name,
            price: dish.price,
            description: dish.description,
            image: dish.image,
        }
    }
}

/// Query parameters for the order listing.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Exclude completed and cancelled orders.
    pub only_active: Option<bool>,
}

impl ListOrdersParams {
    fn page(&self) -> OrderPage {
        OrderPage {
            limit: self.limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
            offset: self.offset.unwrap_or(0).max(0),
            only_active: self.only_active.unwrap_or(false),
        }
    }
}

/// Query parameters for the order search.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct SearchOrdersParams {
    pub term: String,
}

/// Response payload for the active order count.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActiveCountBody {
    pub count: u64,
}

/// Resolve and validate the requested dish ids against the catalog.
///
/// Returns one dish per requested id, duplicates preserved in request order.
async fn resolve_dishes(state: &HttpState, ids: &[Uuid]) -> Result<Vec<Dish>, Error> {
    if ids.is_empty() {
        return Err(Error::invalid_request("order must contain at least one dish"));
    }

    let mut unique: Vec<Uuid> = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }

    let dishes = state
        .catalog
        .get_by_ids(&unique)
        .await
        .map_err(|cause| Error::internal(format!("dish catalog error: {cause}")))?;
    let by_id: HashMap<Uuid, Dish> = dishes.into_iter().map(|dish| (dish.id, dish)).collect();

    let mut resolved = Vec::with_capacity(ids.len());
    for id in ids {
        let dish = by_id
            .get(id)
            .ok_or_else(|| Error::invalid_request("some dishes do not exist"))?;
        if !dish.is_orderable() {
            return Err(Error::invalid_request(
                "some dishes are not available to order",
            ));
        }
        resolved.push(dish.clone());
    }
    Ok(resolved)
}

fn build_request(body: CreateOrderBody, dishes: Vec<Dish>) -> Result<CreateOrderRequest, Error> {
    let CustomerBody {
        name,
        phone,
        address,
        order_type,
        payment_method,
    } = body.customer;

    if order_type == OrderType::Delivery
        && address.as_deref().is_none_or(|a| a.trim().is_empty())
    {
        return Err(Error::invalid_request(
            "delivery orders require an address",
        ));
    }

    let customer = CustomerDraft::new(phone, name, address.clone(), payment_method, order_type)
        .map_err(|cause| Error::invalid_request(cause.to_string()))?;

    Ok(CreateOrderRequest {
        customer,
        dishes,
        order_type,
        payment_method,
        comment: body.comment,
        address,
    })
}

/// Create an order.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = CreateOrderBody,
    responses(
        (status = 200, description = "Order created", body = OrderViewBody),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 500, description = "Order creation failed", body = ApiError)
    ),
    tags = ["orders"],
    operation_id = "createOrder"
)]
#[post("/orders")]
pub async fn create_order(
    state: web::Data<HttpState>,
    body: web::Json<CreateOrderBody>,
) -> ApiResult<web::Json<OrderViewBody>> {
    let body = body.into_inner();
    let dishes = resolve_dishes(&state, &body.dishes)
        .await
        .map_err(ApiError::from)?;
    let request = build_request(body, dishes).map_err(ApiError::from)?;

    let view = state.orders.create_order(request).await?;
    Ok(web::Json(OrderViewBody::from(view)))
}

/// Change the status of an order.
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/status",
    request_body = ChangeStatusBody,
    params(("id" = Uuid, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Status changed", body = OrderViewBody),
        (status = 400, description = "Status incompatible with the order", body = ApiError),
        (status = 404, description = "Order not found", body = ApiError)
    ),
    tags = ["orders"],
    operation_id = "changeOrderStatus"
)]
#[put("/orders/{id}/status")]
pub async fn change_order_status(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    body: web::Json<ChangeStatusBody>,
) -> ApiResult<web::Json<OrderViewBody>> {
    let view = state
        .orders
        .change_status(path.into_inner(), body.status)
        .await?;
    Ok(web::Json(OrderViewBody::from(view)))
}

/// Newest-first page of orders.
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(ListOrdersParams),
    responses(
        (status = 200, description = "Order page", body = [OrderViewBody])
    ),
    tags = ["orders"],
    operation_id = "listOrders"
)]
#[get("/orders")]
pub async fn list_orders(
    state: web::Data<HttpState>,
    params: web::Query<ListOrdersParams>,
) -> ApiResult<web::Json<Vec<OrderViewBody>>> {
    let views = state.orders_query.list_orders(params.page()).await?;
    Ok(web::Json(views.into_iter().map(OrderViewBody::from).collect()))
}

/// Search orders by order number prefix.
#[utoipa::path(
    get,
    path = "/api/v1/orders/search",
    params(SearchOrdersParams),
    responses(
        (status = 200, description = "Matching orders", body = [OrderViewBody])
    ),
    tags = ["orders"],
    operation_id = "searchOrders"
)]
#[get("/orders/search")]
pub async fn search_orders(
    state: web::Data<HttpState>,
    params: web::Query<SearchOrdersParams>,
) -> ApiResult<web::Json<Vec<OrderViewBody>>> {
    let views = state.orders_query.search_orders(&params.term).await?;
    Ok(web::Json(views.into_iter().map(OrderViewBody::from).collect()))
}

/// Count orders outside terminal states.
#[utoipa::path(
    get,
    path = "/api/v1/orders/count/active",
    responses(
        (status = 200, description = "Active order count", body = ActiveCountBody)
    ),
    tags = ["orders"],
    operation_id = "countActiveOrders"
)]
#[get("/orders/count/active")]
pub async fn count_active_orders(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<ActiveCountBody>> {
    let count = state.orders_query.count_active().await?;
    Ok(web::Json(ActiveCountBody { count }))
}

/// Fetch one order.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = Uuid, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Order view", body = OrderViewBody),
        (status = 404, description = "Order not found", body = ApiError)
    ),
    tags = ["orders"],
    operation_id = "getOrder"
)]
#[get("/orders/{id}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<OrderViewBody>> {
    let view = state.orders_query.get_order(path.into_inner()).await?;
    Ok(web::Json(OrderViewBody::from(view)))
}

#[cfg(test)]
#[path = "orders_tests.rs"]
mod tests;
