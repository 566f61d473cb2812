//! Inbound adapters translating transports into domain port calls.

pub mod http;
pub mod ws;
