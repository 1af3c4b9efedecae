use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_with_level;
use dotenvy::dotenv;
use migration::MigratorTrait;
use service::repository::SeaOrmCatalogRepository;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::auth::ServerState;
use crate::routes;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Resolve host/port: env vars win, config file supplies the defaults
fn load_bind_addr(cfg: &configs::ServerConfig) -> anyhow::Result<SocketAddr> {
    let host = env::var("SERVER_HOST").unwrap_or_else(|_| cfg.host.clone());
    let port = env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(cfg.port);
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();

    let cfg = configs::AppConfig::load_or_env()?;
    init_logging_with_level(&cfg.log_level);

    // DB connection + schema
    let db = models::db::connect_with(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;

    let state = ServerState {
        catalog: Arc::new(SeaOrmCatalogRepository::new(db)),
        cfg: Arc::new(cfg),
    };

    // Build router
    let cors = build_cors();
    let addr = load_bind_addr(&state.cfg.server)?;
    let app: Router = routes::build_router(state, cors);

    // Bind and serve
    info!(%addr, "starting service catalogue");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
