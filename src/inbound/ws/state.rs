//! Shared WebSocket adapter state.
//!
//! The adapter holds the sending half of the status event channel; each
//! connection subscribes on upgrade and receives its own receiver, so a slow
//! client never blocks the coordinator or other sessions.

use tokio::sync::broadcast;

use crate::domain::OrderStatusChanged;

/// Dependency bundle for WebSocket handlers.
#[derive(Clone)]
pub struct WsState {
    events: broadcast::Sender<OrderStatusChanged>,
}

impl WsState {
    /// Construct state around the status event channel.
    pub fn new(events: broadcast::Sender<OrderStatusChanged>) -> Self {
        Self { events }
    }

    /// Open a fresh subscription for a new connection.
    pub fn subscribe(&self) -> broadcast::Receiver<OrderStatusChanged> {
        self.events.subscribe()
    }
}
