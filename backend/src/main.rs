//! Backend entry-point: runs pending migrations, builds the connection pool,
//! and serves the HTTP API.

use actix_web::{web, App, HttpServer};
use std::env;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use backend::api::health::{live, ready, HealthState};
use backend::outbound::persistence::{DbPool, MigrationRunner, PoolConfig};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| std::io::Error::other("DATABASE_URL must be set"))?;
    let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into());

    // Migrations run on a blocking Diesel connection before the async pool
    // starts serving traffic.
    let migration_url = database_url.clone();
    let applied = actix_web::rt::task::spawn_blocking(move || {
        let mut runner = MigrationRunner::connect(&migration_url)?;
        runner.apply_all()
    })
    .await
    .map_err(|e| std::io::Error::other(format!("migration task panicked: {e}")))?
    .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))?;
    info!(count = applied.len(), "pending migrations applied");

    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|e| std::io::Error::other(format!("pool build failed: {e}")))?;

    let health_state = web::Data::new(HealthState::new());
    // Clone for server factory so readiness probe remains accessible.
    let server_health_state = health_state.clone();
    let pool_data = web::Data::new(pool);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(server_health_state.clone())
            .app_data(pool_data.clone())
            .service(ready)
            .service(live)
    })
    .bind(bind_address.as_str())?;

    health_state.mark_ready();
    info!(%bind_address, "server listening");
    server.run().await
}
