mod routes;
mod state;

use anyhow::{Context, Result};
use taskplan_core::Config;
use tracing::info;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    taskplan_core::logging::init(&config)?;

    let state = AppState::from_config(&config)?;
    let app = routes::app(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(calendar_id = %config.calendar_id, "taskplan-server listening on http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
