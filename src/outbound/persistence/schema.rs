//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Customers keyed by phone number.
    ///
    /// `phone` carries a unique constraint; order creation upserts against it.
    customers (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Short sequential number shown to staff.
        customer_number -> Int8,
        /// Digits-only phone number, unique per customer.
        phone -> Varchar,
        name -> Varchar,
        address -> Nullable<Varchar>,
        /// Payment method from the most recent order.
        preferred_payment -> Varchar,
        /// Order type from the most recent order.
        preferred_order -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Menu dishes; soft-deleted rows keep their id for historic orders.
    dishes (id) {
        id -> Uuid,
        name -> Varchar,
        /// Unit price with two-decimal scale.
        price -> Numeric,
        /// Hidden dishes stay in the catalog but cannot be ordered.
        visible -> Bool,
        description -> Nullable<Varchar>,
        /// Image path relative to the asset base.
        image -> Nullable<Varchar>,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Orders with denormalised totals and delivery details.
    orders (id) {
        id -> Uuid,
        /// Short sequential number shown to staff and on receipts.
        order_number -> Int8,
        status -> Varchar,
        order_type -> Varchar,
        payment_method -> Varchar,
        /// Total across line items, two-decimal scale.
        price -> Numeric,
        comment -> Nullable<Varchar>,
        address -> Nullable<Varchar>,
        customer_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Order line items; one row per ordered dish, duplicates allowed.
    ///
    /// The serial key doubles as insertion order so views list dishes the way
    /// the customer ordered them.
    order_dishes (id) {
        id -> Int8,
        order_id -> Uuid,
        dish_id -> Uuid,
    }
}

diesel::joinable!(orders -> customers (customer_id));
diesel::joinable!(order_dishes -> orders (order_id));
diesel::joinable!(order_dishes -> dishes (dish_id));

diesel::allow_tables_to_appear_in_same_query!(customers, dishes, orders, order_dishes);
