//! Restaurant back-office order service library modules.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface for tooling.
pub use doc::ApiDoc;
