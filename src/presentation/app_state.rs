// Application state for HTTP handlers
use crate::application::home_service::HomeService;
use crate::application::light_service::LightService;
use crate::application::telemetry_poller::TelemetryPoller;
use crate::domain::light::LightState;
use tokio::sync::{Mutex, RwLock};

pub struct AppState {
    pub home_service: HomeService,
    pub light_service: LightService,
    pub light: RwLock<LightState>,
    pub poller: Mutex<TelemetryPoller>,
}
