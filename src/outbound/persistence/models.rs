//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations, plus the row-to-domain
//! conversions that parse the text-encoded enum columns.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::order::UnknownVariant;
use crate::domain::{Customer, Dish, Order};

use super::schema::{customers, dishes, order_dishes, orders};

/// Row struct for reading from the customers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CustomerRow {
    pub id: Uuid,
    pub customer_number: i64,
    pub phone: String,
    pub name: String,
    pub address: Option<String>,
    pub preferred_payment: String,
    pub preferred_order: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new customer records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = customers)]
pub(crate) struct NewCustomerRow<'a> {
    pub id: Uuid,
    pub phone: &'a str,
    pub name: &'a str,
    pub address: Option<&'a str>,
    pub preferred_payment: &'a str,
    pub preferred_order: &'a str,
}

/// Changeset applied when an existing phone number places another order.
///
/// `treat_none_as_null` makes an omitted address clear the stored one, so the
/// profile always mirrors the latest order.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = customers)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CustomerUpdate<'a> {
    pub name: &'a str,
    pub address: Option<&'a str>,
    pub preferred_payment: &'a str,
    pub preferred_order: &'a str,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the dishes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = dishes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DishRow {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub visible: bool,
    pub description: Option<String>,
    pub image: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Row struct for reading from the orders table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: Uuid,
    pub order_number: i64,
    pub status: String,
    pub order_type: String,
    pub payment_method: String,
    pub price: Decimal,
    pub comment: Option<String>,
    pub address: Option<String>,
    pub customer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new order records.
///
/// `order_number` is assigned by the database sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrderRow<'a> {
    pub id: Uuid,
    pub status: &'a str,
    pub order_type: &'a str,
    pub payment_method: &'a str,
    pub price: Decimal,
    pub comment: Option<&'a str>,
    pub address: Option<&'a str>,
    pub customer_id: Uuid,
}

/// Insertable struct for order line items.
///
/// The serial `id` is assigned by the database and fixes line-item order.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = order_dishes)]
pub(crate) struct NewOrderDishRow {
    pub order_id: Uuid,
    pub dish_id: Uuid,
}

pub(crate) fn row_to_customer(row: CustomerRow) -> Result<Customer, UnknownVariant> {
    Ok(Customer {
        id: row.id,
        customer_number: row.customer_number,
        phone: row.phone,
        name: row.name,
        address: row.address,
        preferred_payment: row.preferred_payment.parse()?,
        preferred_order: row.preferred_order.parse()?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub(crate) fn row_to_order(row: OrderRow) -> Result<Order, UnknownVariant> {
    Ok(Order {
        id: row.id,
        order_number: row.order_number,
        status: row.status.parse()?,
        order_type: row.order_type.parse()?,
        payment_method: row.payment_method.parse()?,
        price: row.price,
        comment: row.comment,
        address: row.address,
        customer_id: row.customer_id,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Convert a dish row, rooting its stored image filename under `asset_base`.
pub(crate) fn row_to_dish(row: DishRow, asset_base: &str) -> Dish {
    let image = row
        .image
        .map(|file| format!("{}/{file}", asset_base.trim_end_matches('/')));
    Dish {
        id: row.id,
        name: row.name,
        price: row.price,
        visible: row.visible,
        description: row.description,
        image,
        deleted_at: row.deleted_at,
    }
}
