//! Customer identity and the validated draft used for upserts.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::order::{OrderType, PaymentMethod};

/// Persisted customer row.
///
/// Business identity is the unique phone number; `customer_number` is a
/// display-only sequential number assigned at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: Uuid,
    pub customer_number: i64,
    pub phone: String,
    pub name: String,
    pub address: Option<String>,
    pub preferred_payment: PaymentMethod,
    pub preferred_order: OrderType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validation failures raised when constructing a [`CustomerDraft`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustomerDraftError {
    #[error("customer phone must be a non-empty numeric string")]
    InvalidPhone,
    #[error("customer name must not be empty")]
    EmptyName,
}

/// Contact and preference data submitted with an order.
///
/// Re-ordering with a known phone number updates the stored name, address,
/// and preferences in place (last write wins) instead of creating a
/// duplicate row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDraft {
    phone: String,
    name: String,
    address: Option<String>,
    preferred_payment: PaymentMethod,
    preferred_order: OrderType,
}

impl CustomerDraft {
    /// Validate and construct a draft.
    ///
    /// # Examples
    /// ```
    /// use bistro_backend::domain::{CustomerDraft, OrderType, PaymentMethod};
    ///
    /// let draft = CustomerDraft::new(
    ///     "5551234",
    ///     "Dana",
    ///     None,
    ///     PaymentMethod::Cash,
    ///     OrderType::Takeaway,
    /// )
    /// .expect("valid draft");
    /// assert_eq!(draft.phone(), "5551234");
    /// ```
    pub fn new(
        phone: impl Into<String>,
        name: impl Into<String>,
        address: Option<String>,
        preferred_payment: PaymentMethod,
        preferred_order: OrderType,
    ) -> Result<Self, CustomerDraftError> {
        let phone = phone.into();
        if phone.is_empty() || !phone.chars().all(|c| c.is_ascii_digit()) {
            return Err(CustomerDraftError::InvalidPhone);
        }

        let name = name.into();
        if name.trim().is_empty() {
            return Err(CustomerDraftError::EmptyName);
        }

        Ok(Self {
            phone,
            name,
            address,
            preferred_payment,
            preferred_order,
        })
    }

    pub fn phone(&self) -> &str {
        self.phone.as_str()
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn preferred_payment(&self) -> PaymentMethod {
        self.preferred_payment
    }

    pub fn preferred_order(&self) -> OrderType {
        self.preferred_order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("555-1234")]
    #[case("phone")]
    fn rejects_non_numeric_phone(#[case] phone: &str) {
        let error = CustomerDraft::new(
            phone,
            "Dana",
            None,
            PaymentMethod::Cash,
            OrderType::Takeaway,
        )
        .expect_err("invalid phone");
        assert_eq!(error, CustomerDraftError::InvalidPhone);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn rejects_blank_name(#[case] name: &str) {
        let error = CustomerDraft::new(
            "5551234",
            name,
            None,
            PaymentMethod::Cash,
            OrderType::Takeaway,
        )
        .expect_err("invalid name");
        assert_eq!(error, CustomerDraftError::EmptyName);
    }

    #[rstest]
    fn accepts_valid_draft() {
        let draft = CustomerDraft::new(
            "5551234",
            "Dana",
            Some("12 Rose St".to_owned()),
            PaymentMethod::BankCard,
            OrderType::Delivery,
        )
        .expect("valid draft");

        assert_eq!(draft.name(), "Dana");
        assert_eq!(draft.address(), Some("12 Rose St"));
        assert_eq!(draft.preferred_payment(), PaymentMethod::BankCard);
        assert_eq!(draft.preferred_order(), OrderType::Delivery);
    }
}
