//! Server configuration parsed from flags and environment.

use std::net::SocketAddr;

use clap::Parser;

/// `bistro-backend` configuration.
///
/// Every flag can also be set through its environment variable, which is how
/// deployments configure the service.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "bistro-backend",
    about = "Restaurant back-office order service",
    version
)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    #[arg(long = "bind-addr", env = "BIND_ADDR", default_value = "127.0.0.1:8080")]
    pub bind_addr: SocketAddr,

    /// PostgreSQL connection URL.
    #[arg(long = "database-url", env = "DATABASE_URL")]
    pub database_url: String,

    /// Base path under which dish images are served.
    #[arg(
        long = "dish-asset-base",
        env = "DISH_ASSET_BASE",
        default_value = "/static/dishes"
    )]
    pub dish_asset_base: String,

    /// Maximum number of pooled database connections.
    #[arg(long = "db-max-connections", env = "DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub db_max_connections: u32,
}
