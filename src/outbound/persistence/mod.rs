//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain ports backed by
//! PostgreSQL via the Diesel ORM with async support through `diesel-async`
//! and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: implementations only translate between Diesel models
//!   and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Async-safe pooling**: connections are managed via `bb8` pools with
//!   proper async integration through `diesel-async`.
//! - **Strongly typed errors**: all database errors are mapped to the
//!   domain's store error type.

mod diesel_dish_catalog;
mod diesel_order_repository;
mod diesel_order_unit_of_work;
mod error_mapping;
mod models;
mod pool;
mod schema;

pub use diesel_dish_catalog::DieselDishCatalog;
pub use diesel_order_repository::DieselOrderRepository;
pub use diesel_order_unit_of_work::DieselOrderUnitOfWork;
pub use pool::{DbPool, PoolConfig, PoolError};
