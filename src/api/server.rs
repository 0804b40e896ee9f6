use super::routes::{set_brightness, set_color};
use super::state::AppState;
use crate::domain::settings::Settings;
use crate::infrastructure::bluetooth::{BleLink, BulbClient};
use anyhow::Context;
use axum::routing::post;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Run the bulb service until ctrl-c.
///
/// The client connects once at startup; a failure there is logged and the
/// first write will retry through the client's reconnect path. The bulb is
/// disconnected after the server drains.
pub async fn run_bulb_service(settings: &Settings) -> anyhow::Result<()> {
    let link = BleLink::new(
        settings.bulb_name.clone(),
        Duration::from_secs(settings.scan_seconds),
    )
    .await?;
    let mut client = BulbClient::new(link);

    if !client.connect().await {
        warn!("Failed to connect to bulb at startup");
    }
    debug!("Bulb client state: {:?}", client.status());
    let state = AppState::new(client);

    let app = axum::Router::new()
        .route("/set_color", post(set_color))
        .route("/set_brightness", post(set_brightness))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind(&settings.http_bind)
        .await
        .with_context(|| format!("Failed to bind {}", settings.http_bind))?;
    info!("Bulb service listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.bulb.lock().await.disconnect().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Unable to listen for shutdown signal: {e}");
    }
}
