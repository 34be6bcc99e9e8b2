// Device API port - the only way the core talks to the device
use crate::domain::device::DeviceInfo;
use crate::domain::light::BrightnessCommand;
use crate::domain::telemetry::Sample;
use async_trait::async_trait;

pub const SYSTEM_INFO_PATH: &str = "/api/v1/system/info";
pub const RAW_TEMPERATURE_PATH: &str = "/api/v1/temp/raw";
pub const LIGHT_BRIGHTNESS_PATH: &str = "/api/v1/light/brightness";

/// The single failure kind of a device call: it never reached the device,
/// the device answered non-2xx, or the answer could not be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request to {path} failed: {message}")]
    Request { path: &'static str, message: String },
    #[error("{path} answered with status {status}")]
    Status { path: &'static str, status: u16 },
    #[error("could not decode response from {path}: {message}")]
    Decode { path: &'static str, message: String },
}

#[async_trait]
pub trait DeviceApi: Send + Sync {
    /// Read the device identity
    async fn get_system_info(&self) -> Result<DeviceInfo, TransportError>;

    /// Read one raw temperature sample
    async fn get_raw_temperature(&self) -> Result<Sample, TransportError>;

    /// Write all three light channels in one request
    async fn set_brightness(&self, command: &BrightnessCommand) -> Result<(), TransportError>;
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    pub fn unreachable(path: &'static str) -> TransportError {
        TransportError::Request {
            path,
            message: "connection refused".to_string(),
        }
    }

    /// In-memory device that replays scripted readings and records writes.
    #[derive(Default)]
    pub struct ScriptedDevice {
        pub info: Option<DeviceInfo>,
        pub readings: Mutex<VecDeque<Result<f64, TransportError>>>,
        pub fallback_reading: Option<f64>,
        pub reading_delay: Option<Duration>,
        pub fail_writes: bool,
        pub reads: Mutex<usize>,
        pub writes: Mutex<Vec<BrightnessCommand>>,
    }

    impl ScriptedDevice {
        pub fn with_readings(readings: Vec<Result<f64, TransportError>>) -> Self {
            Self {
                readings: Mutex::new(readings.into()),
                ..Self::default()
            }
        }

        pub fn read_count(&self) -> usize {
            *self.reads.lock().unwrap()
        }

        pub fn written(&self) -> Vec<BrightnessCommand> {
            self.writes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DeviceApi for ScriptedDevice {
        async fn get_system_info(&self) -> Result<DeviceInfo, TransportError> {
            self.info.clone().ok_or_else(|| unreachable(SYSTEM_INFO_PATH))
        }

        async fn get_raw_temperature(&self) -> Result<Sample, TransportError> {
            *self.reads.lock().unwrap() += 1;
            let next = self.readings.lock().unwrap().pop_front();
            if let Some(delay) = self.reading_delay {
                tokio::time::sleep(delay).await;
            }
            match next {
                Some(result) => result.map(Sample::new),
                None => self
                    .fallback_reading
                    .map(Sample::new)
                    .ok_or_else(|| unreachable(RAW_TEMPERATURE_PATH)),
            }
        }

        async fn set_brightness(&self, command: &BrightnessCommand) -> Result<(), TransportError> {
            self.writes.lock().unwrap().push(*command);
            if self.fail_writes {
                return Err(unreachable(LIGHT_BRIGHTNESS_PATH));
            }
            Ok(())
        }
    }
}
