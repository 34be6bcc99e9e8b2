// Home service - Device identity for the home view
use crate::application::device_api::DeviceApi;
use crate::domain::device::DeviceInfo;
use std::sync::Arc;

#[derive(Clone)]
pub struct HomeService {
    api: Arc<dyn DeviceApi>,
}

impl HomeService {
    pub fn new(api: Arc<dyn DeviceApi>) -> Self {
        Self { api }
    }

    /// Fetches identity once per mount. Any failure leaves the empty defaults in place.
    pub async fn load_device_info(&self) -> DeviceInfo {
        match self.api.get_system_info().await {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!("Error fetching system info: {}", e);
                DeviceInfo::default()
            }
        }
    }
}
