//! Wire-level message definitions for the WebSocket adapter.
//!
//! Domain events are transformed into these payloads before being serialized
//! to JSON and sent to connected clients.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{OrderStatus, OrderStatusChanged};

/// Data block of a `STATUS_CHANGE` frame.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeData {
    pub id: Uuid,
    pub order_number: i64,
    pub status: OrderStatus,
}

/// Envelope for every frame sent to clients.
#[derive(Debug, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerFrame {
    StatusChange(StatusChangeData),
}

impl From<OrderStatusChanged> for ServerFrame {
    fn from(event: OrderStatusChanged) -> Self {
        Self::StatusChange(StatusChangeData {
            id: event.order_id,
            order_number: event.order_number,
            status: event.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn status_change_frame_has_the_published_shape() {
        let order_id = Uuid::nil();
        let frame = ServerFrame::from(OrderStatusChanged {
            order_id,
            order_number: 42,
            status: OrderStatus::Cooking,
        });

        let value = serde_json::to_value(&frame).expect("serialises");
        assert_eq!(
            value,
            serde_json::json!({
                "event": "STATUS_CHANGE",
                "data": {
                    "id": order_id,
                    "orderNumber": 42,
                    "status": "cooking"
                }
            })
        );
    }
}
