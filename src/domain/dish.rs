//! Read-only catalog dish view consumed by the order core.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Catalog dish as resolved by the catalog collaborator.
///
/// The `image` path is already resolved against the configured asset base;
/// the core never touches file storage itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dish {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub visible: bool,
    pub description: Option<String>,
    pub image: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Dish {
    /// True when the dish may appear on a new order: listed and not
    /// soft-deleted.
    pub fn is_orderable(&self) -> bool {
        self.visible && self.deleted_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dish(visible: bool, deleted: bool) -> Dish {
        Dish {
            id: Uuid::new_v4(),
            name: "Margherita".to_owned(),
            price: Decimal::new(1050, 2),
            visible,
            description: None,
            image: None,
            deleted_at: deleted.then(Utc::now),
        }
    }

    #[rstest]
    #[case(true, false, true)]
    #[case(false, false, false)]
    #[case(true, true, false)]
    #[case(false, true, false)]
    fn orderable_requires_visible_and_live(
        #[case] visible: bool,
        #[case] deleted: bool,
        #[case] orderable: bool,
    ) {
        assert_eq!(dish(visible, deleted).is_orderable(), orderable);
    }
}
