// HTTP implementation of the device API
use crate::application::device_api::{
    DeviceApi, TransportError, LIGHT_BRIGHTNESS_PATH, RAW_TEMPERATURE_PATH, SYSTEM_INFO_PATH,
};
use crate::domain::device::DeviceInfo;
use crate::domain::light::BrightnessCommand;
use crate::domain::telemetry::Sample;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpDeviceApi {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct RawReading {
    raw: f64,
}

impl HttpDeviceApi {
    pub fn new(base_url: String, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        path: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, TransportError> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| TransportError::Request {
                path,
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TransportError::Status {
                path,
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &'static str) -> Result<T, TransportError> {
        let response = self.send(path, self.client.get(self.url(path))).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| TransportError::Decode {
                path,
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl DeviceApi for HttpDeviceApi {
    async fn get_system_info(&self) -> Result<DeviceInfo, TransportError> {
        self.get_json(SYSTEM_INFO_PATH).await
    }

    async fn get_raw_temperature(&self) -> Result<Sample, TransportError> {
        let reading: RawReading = self.get_json(RAW_TEMPERATURE_PATH).await?;
        tracing::debug!("Raw temperature reading: {}", reading.raw);
        Ok(Sample::new(reading.raw))
    }

    async fn set_brightness(&self, command: &BrightnessCommand) -> Result<(), TransportError> {
        let request = self
            .client
            .post(self.url(LIGHT_BRIGHTNESS_PATH))
            .json(command);
        // The device's reply body is not used.
        self.send(LIGHT_BRIGHTNESS_PATH, request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::light::{Channel, ClampPolicy, LightState};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    /// Serves `router` on an ephemeral port and returns its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn client(base_url: String) -> HttpDeviceApi {
        HttpDeviceApi::new(base_url, Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_get_system_info() {
        let router = Router::new().route(
            SYSTEM_INFO_PATH,
            get(|| async { Json(json!({"version": "v5.1.2", "cores": 2})) }),
        );
        let api = client(serve(router).await);

        let info = api.get_system_info().await.unwrap();
        assert_eq!(info, DeviceInfo::new("v5.1.2".to_string(), 2));
    }

    #[tokio::test]
    async fn test_get_raw_temperature() {
        let router = Router::new().route(
            RAW_TEMPERATURE_PATH,
            get(|| async { Json(json!({"raw": 13})) }),
        );
        let api = client(serve(router).await);

        assert_eq!(api.get_raw_temperature().await.unwrap(), Sample::new(13.0));
    }

    #[tokio::test]
    async fn test_non_success_status_is_transport_error() {
        let router = Router::new().route(
            RAW_TEMPERATURE_PATH,
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let api = client(serve(router).await);

        assert_eq!(
            api.get_raw_temperature().await.unwrap_err(),
            TransportError::Status {
                path: RAW_TEMPERATURE_PATH,
                status: 500
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_transport_error() {
        let router = Router::new().route(
            SYSTEM_INFO_PATH,
            get(|| async { Json(json!({"cores": "many"})) }),
        );
        let api = client(serve(router).await);

        assert!(matches!(
            api.get_system_info().await,
            Err(TransportError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_device_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let api = client(format!("http://{}", addr));

        assert!(matches!(
            api.get_raw_temperature().await,
            Err(TransportError::Request { .. })
        ));
    }

    #[tokio::test]
    async fn test_set_brightness_posts_three_channels() {
        let received: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let router = Router::new().route(
            LIGHT_BRIGHTNESS_PATH,
            post(move |Json(body): Json<Value>| {
                let sink = sink.clone();
                async move {
                    sink.lock().unwrap().push(body);
                    "Post control value successfully"
                }
            }),
        );
        let api = client(serve(router).await);

        let mut light = LightState::new(128.0, ClampPolicy::default());
        light.set_level(Channel::Red, 255.0);
        light.set_level(Channel::Green, 0.0);
        light.set_level(Channel::Blue, 10.0);
        api.set_brightness(&light.command()).await.unwrap();

        let bodies = received.lock().unwrap().clone();
        assert_eq!(bodies, vec![json!({"red": 255, "green": 0, "blue": 10})]);
    }
}
