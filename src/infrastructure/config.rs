use crate::domain::light::ClampPolicy;
use crate::domain::telemetry::DEFAULT_SEED;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub device: DeviceSettings,
    pub telemetry: TelemetrySettings,
    pub light: LightSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DeviceSettings {
    pub base_url: String,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetrySettings {
    pub poll_interval_ms: u64,
    /// Placeholder series; its length is the buffer capacity.
    pub seed: Vec<f64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LightSettings {
    pub initial: f64,
    pub clamp_low: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
    /// Built page assets served for every path the API does not claim.
    pub static_dir: String,
}

impl DashboardConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.telemetry.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.device.request_timeout_ms)
    }

    pub fn clamp_policy(&self) -> ClampPolicy {
        ClampPolicy {
            clamp_low: self.light.clamp_low,
        }
    }
}

fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("device.base_url", "http://192.168.4.1")?
        .set_default("device.request_timeout_ms", 5000)?
        .set_default("telemetry.poll_interval_ms", 1000)?
        .set_default("telemetry.seed", DEFAULT_SEED.to_vec())?
        .set_default("light.initial", 128.0)?
        .set_default("light.clamp_low", false)?
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("server.static_dir", "web")
}

/// Defaults, then `config/dashboard.*` if present, then `DASHBOARD__*` variables.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = with_defaults()?
        .add_source(File::with_name("config/dashboard").required(false))
        .add_source(
            Environment::with_prefix("DASHBOARD")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    parse(settings)
}

fn parse(settings: Config) -> anyhow::Result<DashboardConfig> {
    let config: DashboardConfig = settings.try_deserialize()?;
    anyhow::ensure!(!config.telemetry.seed.is_empty(), "telemetry.seed must not be empty");
    anyhow::ensure!(
        config.telemetry.poll_interval_ms > 0,
        "telemetry.poll_interval_ms must be positive"
    );
    anyhow::ensure!(
        config.telemetry.seed.iter().all(|v| v.is_finite()),
        "telemetry.seed must contain only finite numbers"
    );
    anyhow::ensure!(config.light.initial.is_finite(), "light.initial must be a finite number");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> anyhow::Result<DashboardConfig> {
        let settings = with_defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        parse(settings)
    }

    #[test]
    fn test_defaults() {
        let config = parse(with_defaults().unwrap().build().unwrap()).unwrap();

        assert_eq!(config.device.base_url, "http://192.168.4.1");
        assert_eq!(config.poll_interval(), Duration::from_millis(1000));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.telemetry.seed, DEFAULT_SEED.to_vec());
        assert_eq!(config.light.initial, 128.0);
        assert_eq!(config.clamp_policy(), ClampPolicy::default());
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.server.static_dir, "web");
    }

    #[test]
    fn test_file_overrides() {
        let config = from_toml(
            r#"
            [device]
            base_url = "http://esp-home.local"

            [telemetry]
            seed = [1.0, 2.0, 3.0]

            [light]
            clamp_low = true
            "#,
        )
        .unwrap();

        assert_eq!(config.device.base_url, "http://esp-home.local");
        assert_eq!(config.telemetry.seed, vec![1.0, 2.0, 3.0]);
        assert!(config.clamp_policy().clamp_low);
        assert_eq!(config.telemetry.poll_interval_ms, 1000);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        assert!(from_toml("[telemetry]\npoll_interval_ms = 0\n").is_err());
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let err = from_toml("[light]\ninitial = nan\n").unwrap_err();
        assert!(err.to_string().contains("light.initial"));

        let err = from_toml("[telemetry]\nseed = [nan, 1.0]\n").unwrap_err();
        assert!(err.to_string().contains("telemetry.seed"));

        assert!(from_toml("[telemetry]\nseed = [1.0, inf]\n").is_err());
    }
}
