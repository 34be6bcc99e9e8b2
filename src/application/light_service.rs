// Light service - Submits the three channel levels as one write
use crate::application::device_api::{DeviceApi, TransportError};
use crate::domain::light::BrightnessCommand;
use std::sync::Arc;

#[derive(Clone)]
pub struct LightService {
    api: Arc<dyn DeviceApi>,
}

impl LightService {
    pub fn new(api: Arc<dyn DeviceApi>) -> Self {
        Self { api }
    }

    /// Sends `command` once. The outcome is logged and returned; it never
    /// feeds back into the local channel levels.
    pub async fn submit(&self, command: BrightnessCommand) -> Result<(), TransportError> {
        let result = self.api.set_brightness(&command).await;
        match &result {
            Ok(()) => tracing::info!(
                red = %command.red,
                green = %command.green,
                blue = %command.blue,
                "light brightness submitted"
            ),
            Err(e) => tracing::warn!("Error submitting light brightness: {}", e),
        }
        result
    }
}
