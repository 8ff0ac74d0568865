use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, AppState};
use service::{
    collection::CollectionStore,
    dispatch::{DispatchMode, Dispatcher},
    storage::S3ObjectStore,
};

fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn dispatch_mode(mode: configs::ApiMode) -> DispatchMode {
    match mode {
        configs::ApiMode::Canonical => DispatchMode::Canonical,
        configs::ApiMode::AppendOnly => DispatchMode::AppendOnly,
    }
}

/// Bind address from validated config, with env vars taking precedence.
fn load_bind_addr(cfg: &configs::ServerConfig) -> anyhow::Result<SocketAddr> {
    let host = env::var("SERVER_HOST").unwrap_or_else(|_| cfg.host.clone());
    let port = env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(cfg.port);
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Public entry: build the app and run the HTTP server.
///
/// Fails fast when the bucket identity is missing; the bucket is read once
/// here and injected into the collection store, never consulted again.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = configs::AppConfig::load_and_validate()?;

    let store = S3ObjectStore::from_env(cfg.storage.bucket.clone()).await;
    info!(bucket = %cfg.storage.bucket, mode = ?cfg.api.mode, "object store configured");

    let dispatcher = Dispatcher::with_mode(
        CollectionStore::new(Arc::new(store)),
        dispatch_mode(cfg.api.mode),
    );

    let app: Router = routes::build_router(AppState { dispatcher }, build_cors());

    let addr = load_bind_addr(&cfg.server)?;
    info!(%addr, "starting postbox server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
