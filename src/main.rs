// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tokio::sync::{Mutex, RwLock};
use tracing_subscriber::EnvFilter;

use crate::application::device_api::DeviceApi;
use crate::application::home_service::HomeService;
use crate::application::light_service::LightService;
use crate::application::telemetry_poller::TelemetryPoller;
use crate::domain::light::LightState;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_device_api::HttpDeviceApi;
use crate::presentation::app_state::AppState;
use crate::presentation::router::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Device client (infrastructure layer)
    let device: Arc<dyn DeviceApi> = Arc::new(HttpDeviceApi::new(
        config.device.base_url.clone(),
        config.request_timeout(),
    )?);

    // Services and view state (application + domain layers)
    let poller = TelemetryPoller::new(
        device.clone(),
        config.poll_interval(),
        config.telemetry.seed.clone(),
    )?;
    let state = Arc::new(AppState {
        home_service: HomeService::new(device.clone()),
        light_service: LightService::new(device),
        light: RwLock::new(LightState::new(config.light.initial, config.clamp_policy())),
        poller: Mutex::new(poller),
    });

    // Build router (presentation layer)
    let app = router(state, &config.server.static_dir);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!(
        "Starting esp-dashboard on {} for device {}",
        addr,
        config.device.base_url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
