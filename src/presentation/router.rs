// Router - API routes plus the built page as fallback
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_chart, get_home, get_light, health_check, put_channel, start_chart, stop_chart,
    stream_chart, submit_light,
};
use axum::{
    routing::{get, post, put},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/home", get(get_home))
        .route("/api/chart", get(get_chart))
        .route("/api/chart/session", post(start_chart).delete(stop_chart))
        .route("/api/chart/stream", get(stream_chart))
        .route("/api/light", get(get_light))
        .route("/api/light/submit", post(submit_light))
        .route("/api/light/:channel", put(put_channel))
        // Directory requests resolve to index.html, as the device firmware does.
        .fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
