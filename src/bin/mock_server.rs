use std::net::SocketAddr;

use anyhow::Context;
use coco_labor::{
    backend::{self, Store},
    config,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_config = config::load_config().context("failed to load configuration")?;
    config::init_tracing(app_config.log_level(), app_config.log_json);

    let addr: SocketAddr = app_config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid bind address {}", app_config.server_addr()))?;

    let today = chrono::Local::now().date_naive();
    let app = backend::router(backend::shared(Store::seeded(today)));

    info!("Starting labor mock server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;
    Ok(())
}
