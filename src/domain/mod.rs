//! Domain entities, rules, and services for the order lifecycle.
//!
//! This module owns the parts of the system with real invariants: currency
//! arithmetic for order totals, the order status machine, and the
//! transactional order-creation workflow. Everything that touches
//! infrastructure goes through the ports defined in [`ports`].

pub mod customer;
pub mod dish;
pub mod error;
pub mod order;
pub mod order_service;
pub mod ports;
pub mod pricing;

pub use self::customer::{Customer, CustomerDraft, CustomerDraftError};
pub use self::dish::Dish;
pub use self::error::{Error, ErrorCode};
pub use self::order::{
    NewOrder, Order, OrderStatus, OrderStatusChanged, OrderType, OrderView, PaymentMethod,
    status_allowed_for,
};
pub use self::order_service::OrderService;
