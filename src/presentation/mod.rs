// Presentation layer - JSON/SSE bindings for the browser page
pub mod app_state;
pub mod handlers;
pub mod router;
