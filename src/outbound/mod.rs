//! Outbound adapters: PostgreSQL persistence and status event publishing.

pub mod notify;
pub mod persistence;
