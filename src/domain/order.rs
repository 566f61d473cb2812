//! Order aggregate, status machine rules, and status-change events.
//!
//! Status legality is expressed as pure functions over the enums so the rules
//! are unit-testable without any request handling or persistence in sight.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::customer::Customer;
use super::dish::Dish;

/// Raised when a stored or submitted enum value is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised {field} value: {value}")]
pub struct UnknownVariant {
    field: &'static str,
    value: String,
}

impl UnknownVariant {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_owned(),
        }
    }
}

/// Payment method chosen for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    Cash,
    BankCard,
}

impl PaymentMethod {
    /// Wire and storage representation of the variant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::BankCard => "bank-card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "cash" => Ok(Self::Cash),
            "bank-card" => Ok(Self::BankCard),
            other => Err(UnknownVariant::new("payment method", other)),
        }
    }
}

/// Whether the order is brought to the customer or picked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    Delivery,
    Takeaway,
}

impl OrderType {
    /// Wire and storage representation of the variant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delivery => "delivery",
            Self::Takeaway => "takeaway",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "delivery" => Ok(Self::Delivery),
            "takeaway" => Ok(Self::Takeaway),
            other => Err(UnknownVariant::new("order type", other)),
        }
    }
}

/// Lifecycle status of an order.
///
/// The nominal path is `created → confirmed → cooking → delivering|waiting →
/// completed`; `cancelled` is reachable from any non-terminal state. Both
/// `completed` and `cancelled` are absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Created,
    Confirmed,
    Cooking,
    Delivering,
    Waiting,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Wire and storage representation of the variant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Confirmed => "confirmed",
            Self::Cooking => "cooking",
            Self::Delivering => "delivering",
            Self::Waiting => "waiting",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// True for absorbing states that permit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "created" => Ok(Self::Created),
            "confirmed" => Ok(Self::Confirmed),
            "cooking" => Ok(Self::Cooking),
            "delivering" => Ok(Self::Delivering),
            "waiting" => Ok(Self::Waiting),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownVariant::new("order status", other)),
        }
    }
}

/// Whether `target` is a legal status for an order of the given type.
///
/// `waiting` marks a takeaway order ready for pickup and `delivering` a
/// delivery order on the road; each is illegal for the other type. Every
/// other combination is allowed.
pub fn status_allowed_for(order_type: OrderType, target: OrderStatus) -> bool {
    !matches!(
        (order_type, target),
        (OrderType::Delivery, OrderStatus::Waiting)
            | (OrderType::Takeaway, OrderStatus::Delivering)
    )
}

/// Persisted order row.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    /// Sequential display number assigned by the store at creation.
    pub order_number: i64,
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub payment_method: PaymentMethod,
    /// Total price snapshot taken at creation; immutable afterwards.
    pub price: Decimal,
    pub comment: Option<String>,
    pub address: Option<String>,
    pub customer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a new order row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub payment_method: PaymentMethod,
    pub price: Decimal,
    pub comment: Option<String>,
    pub address: Option<String>,
    pub customer_id: Uuid,
}

/// Fully materialised order: the row plus its customer and resolved dishes.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderView {
    pub order: Order,
    pub customer: Customer,
    pub dishes: Vec<Dish>,
}

/// Event broadcast after a successful status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderStatusChanged {
    pub order_id: Uuid,
    pub order_number: i64,
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(OrderType::Delivery, OrderStatus::Waiting, false)]
    #[case(OrderType::Takeaway, OrderStatus::Delivering, false)]
    #[case(OrderType::Delivery, OrderStatus::Delivering, true)]
    #[case(OrderType::Takeaway, OrderStatus::Waiting, true)]
    #[case(OrderType::Delivery, OrderStatus::Created, true)]
    #[case(OrderType::Delivery, OrderStatus::Confirmed, true)]
    #[case(OrderType::Takeaway, OrderStatus::Cooking, true)]
    #[case(OrderType::Delivery, OrderStatus::Completed, true)]
    #[case(OrderType::Takeaway, OrderStatus::Cancelled, true)]
    fn status_type_compatibility(
        #[case] order_type: OrderType,
        #[case] target: OrderStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(status_allowed_for(order_type, target), allowed);
    }

    #[rstest]
    #[case(OrderStatus::Completed, true)]
    #[case(OrderStatus::Cancelled, true)]
    #[case(OrderStatus::Created, false)]
    #[case(OrderStatus::Cooking, false)]
    #[case(OrderStatus::Waiting, false)]
    fn terminal_states(#[case] status: OrderStatus, #[case] terminal: bool) {
        assert_eq!(status.is_terminal(), terminal);
    }

    #[rstest]
    #[case("created", OrderStatus::Created)]
    #[case("delivering", OrderStatus::Delivering)]
    #[case("cancelled", OrderStatus::Cancelled)]
    fn status_round_trips_through_text(#[case] text: &str, #[case] status: OrderStatus) {
        assert_eq!(text.parse::<OrderStatus>().expect("parses"), status);
        assert_eq!(status.as_str(), text);
    }

    #[rstest]
    fn bank_card_uses_kebab_case_on_the_wire() {
        let value = serde_json::to_value(PaymentMethod::BankCard).expect("serialises");
        assert_eq!(value, serde_json::json!("bank-card"));
        assert_eq!("bank-card".parse::<PaymentMethod>(), Ok(PaymentMethod::BankCard));
    }

    #[rstest]
    fn unknown_status_is_rejected() {
        let error = "sleeping".parse::<OrderStatus>().expect_err("rejected");
        assert!(error.to_string().contains("sleeping"));
    }
}
