pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod model;
pub mod predictor;
pub mod schema;

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*};

use crate::app::AppState;
use crate::config::Config;
use crate::predictor::TreeEnsemble;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(config::log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    let config = Config::parse();

    let model = TreeEnsemble::load(&config.model_path)
        .with_context(|| format!("loading model from {}", config.model_path.display()))?;
    info!(
        path = %config.model_path.display(),
        trees = model.num_trees(),
        "loaded sleep quality model"
    );

    let state = AppState {
        predictor: Arc::new(model),
    };

    let app = app::create_router(state);
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
