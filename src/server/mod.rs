//! Server construction and wiring.
//!
//! Builds the dependency graph from configuration: pool, persistence
//! adapters, the order service, and the shared status event channel that
//! links the coordinator to WebSocket sessions. Embedded migrations run
//! before the server accepts traffic.

mod config;

pub use config::AppConfig;

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::domain::OrderService;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::inbound::ws;
use crate::inbound::ws::state::WsState;
use crate::outbound::notify::{BroadcastStatusNotifier, order_event_channel};
use crate::outbound::persistence::{
    DbPool, DieselDishCatalog, DieselOrderRepository, DieselOrderUnitOfWork, PoolConfig,
};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    ws_state: web::Data<WsState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        ws_state,
    } = deps;

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(ws_state)
        .service(live)
        .service(ready)
        .service(ws::ws_entry)
        .service(web::scope("/api/v1").configure(crate::inbound::http::configure))
}

/// Apply pending migrations on a dedicated blocking connection.
async fn run_migrations(database_url: String) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&database_url)
            .map_err(|error| std::io::Error::other(format!("database connect: {error}")))?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|error| std::io::Error::other(format!("migrations: {error}")))?;
        if !applied.is_empty() {
            info!(count = applied.len(), "applied database migrations");
        }
        Ok(())
    })
    .await
    .map_err(|error| std::io::Error::other(format!("migration task: {error}")))?
}

fn build_dependencies(pool: DbPool, config: &AppConfig) -> AppDependencies {
    let events = order_event_channel();

    let unit_of_work = Arc::new(DieselOrderUnitOfWork::new(pool.clone()));
    let orders_repo = Arc::new(DieselOrderRepository::new(
        pool.clone(),
        config.dish_asset_base.clone(),
    ));
    let catalog = Arc::new(DieselDishCatalog::new(
        pool,
        config.dish_asset_base.clone(),
    ));
    let notifier = Arc::new(BroadcastStatusNotifier::new(events.clone()));

    let service = Arc::new(OrderService::new(unit_of_work, orders_repo, notifier));

    AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(HttpState::new(service.clone(), service, catalog)),
        ws_state: web::Data::new(WsState::new(events)),
    }
}

/// Run the server until it is shut down.
pub async fn run(config: AppConfig) -> std::io::Result<()> {
    run_migrations(config.database_url.clone()).await?;

    let pool = DbPool::new(
        PoolConfig::new(&config.database_url).with_max_size(config.db_max_connections),
    )
    .await
    .map_err(|error| std::io::Error::other(format!("database pool: {error}")))?;

    let deps = build_dependencies(pool, &config);
    let health_state = deps.health_state.clone();

    let server = HttpServer::new(move || build_app(deps.clone())).bind(config.bind_addr)?;

    health_state.mark_ready();
    info!(addr = %config.bind_addr, "server listening");
    server.run().await
}
