//! Status event publishing over a broadcast channel.
//!
//! The coordinator talks to the [`StatusNotifier`] port; this adapter fans the
//! event out to every live WebSocket session. Publishing never blocks and
//! never fails the transition that triggered it: an order with no listeners is
//! still a valid order.

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::domain::OrderStatusChanged;
use crate::domain::ports::StatusNotifier;

/// Buffered events per subscriber before a slow client starts lagging.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Create the status event channel shared by the notifier and ws sessions.
pub fn order_event_channel() -> broadcast::Sender<OrderStatusChanged> {
    broadcast::channel(EVENT_CHANNEL_CAPACITY).0
}

/// Publishes status changes to all subscribed WebSocket sessions.
pub struct BroadcastStatusNotifier {
    events: broadcast::Sender<OrderStatusChanged>,
}

impl BroadcastStatusNotifier {
    pub fn new(events: broadcast::Sender<OrderStatusChanged>) -> Self {
        Self { events }
    }
}

impl StatusNotifier for BroadcastStatusNotifier {
    fn notify(&self, event: OrderStatusChanged) {
        info!(
            order = %format!("{:04}", event.order_number),
            status = %event.status,
            "order status changed"
        );
        if self.events.send(event).is_err() {
            // No subscribers; the event is only of interest to live sessions.
            debug!(order_id = %event.order_id, "status change had no listeners");
        }
    }
}

/// Notifier that drops every event; used where no socket layer is wired.
pub struct NoopStatusNotifier;

impl StatusNotifier for NoopStatusNotifier {
    fn notify(&self, _event: OrderStatusChanged) {}
}
