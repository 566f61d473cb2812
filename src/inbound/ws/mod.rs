//! WebSocket inbound adapter broadcasting order status changes.
//!
//! Clients connect to `/ws/orders` and receive a `STATUS_CHANGE` frame for
//! every accepted status transition. The socket is one-way: inbound frames
//! only feed the heartbeat.

use actix_web::web::{self, Payload};
use actix_web::{HttpRequest, HttpResponse, get, rt};
use tracing::error;

mod session;

pub mod messages;
pub mod state;

/// Handle the WebSocket upgrade for `/ws/orders`.
#[get("/ws/orders")]
pub async fn ws_entry(
    state: web::Data<state::WsState>,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let (response, session, stream) = actix_ws::handle(&req, stream).map_err(|cause| {
        error!(error = %cause, "WebSocket upgrade failed");
        actix_web::error::ErrorInternalServerError("WebSocket upgrade failed")
    })?;

    let events = state.subscribe();
    rt::spawn(session::handle_ws_session(events, session, stream));

    Ok(response)
}
