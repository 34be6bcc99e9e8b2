// HTTP request handlers
use crate::application::telemetry_view::PollerError;
use crate::domain::device::DeviceInfo;
use crate::domain::light::{Channel, Color, InputError, Level, LightState};
use crate::domain::telemetry::ChartSnapshot;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One channel as the page draws it: the range slider and the number box
/// are two bindings of the same level.
#[derive(Debug, Serialize)]
pub struct ChannelBinding {
    pub channel: Channel,
    pub slider: Level,
    pub number: Level,
}

#[derive(Debug, Serialize)]
pub struct LightView {
    pub channels: Vec<ChannelBinding>,
    pub color: Color,
    pub swatch: String,
}

impl LightView {
    fn from_state(state: &LightState) -> Self {
        let channels = Channel::ALL
            .into_iter()
            .map(|channel| {
                let level = state.level(channel);
                ChannelBinding {
                    channel,
                    slider: level,
                    number: level,
                }
            })
            .collect();
        let color = state.color();
        Self {
            channels,
            swatch: color.css(),
            color,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChannelInput {
    pub input: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Mount the home view: identity is fetched fresh every time
pub async fn get_home(State(state): State<Arc<AppState>>) -> Json<DeviceInfo> {
    Json(state.home_service.load_device_info().await)
}

/// Mount the chart view
pub async fn start_chart(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<ChartSnapshot>), StatusCode> {
    let mut poller = state.poller.lock().await;
    match poller.start() {
        Ok(rx) => {
            let snapshot = rx.borrow().clone();
            Ok((StatusCode::CREATED, Json(snapshot)))
        }
        Err(PollerError::AlreadyRunning) => Err(StatusCode::CONFLICT),
        Err(e) => {
            tracing::error!("Error starting telemetry poller: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Unmount the chart view
pub async fn stop_chart(State(state): State<Arc<AppState>>) -> StatusCode {
    match state.poller.lock().await.stop().await {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(_) => StatusCode::NOT_FOUND,
    }
}

pub async fn get_chart(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ChartSnapshot>, StatusCode> {
    state
        .poller
        .lock()
        .await
        .snapshot()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Push every buffer mutation to the page until the view is unmounted
pub async fn stream_chart(
    State(state): State<Arc<AppState>>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, StatusCode> {
    let mut rx = state
        .poller
        .lock()
        .await
        .subscribe()
        .ok_or(StatusCode::NOT_FOUND)?;

    let stream = async_stream::stream! {
        loop {
            let snapshot = rx.borrow_and_update().clone();
            yield Event::default().json_data(&snapshot);
            if rx.changed().await.is_err() {
                break;
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

pub async fn get_light(State(state): State<Arc<AppState>>) -> Json<LightView> {
    Json(LightView::from_state(&*state.light.read().await))
}

/// One input event from either widget of a channel
pub async fn put_channel(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChannelInput>,
) -> Result<Json<LightView>, (StatusCode, String)> {
    let channel: Channel = name
        .parse()
        .map_err(|e: InputError| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let mut light = state.light.write().await;
    light
        .apply_input(channel, &body.input)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    Ok(Json(LightView::from_state(&light)))
}

/// Submit the current levels. The device's answer is only logged.
pub async fn submit_light(State(state): State<Arc<AppState>>) -> StatusCode {
    let command = state.light.read().await.command();
    let _ = state.light_service.submit(command).await;
    StatusCode::ACCEPTED
}
