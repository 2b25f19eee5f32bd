//! HTTP API handlers for stemview-ui
//!
//! Browser page, upload and disclosure endpoints, SSE progress, health.

pub mod disclosure;
pub mod health;
pub mod sse;
pub mod ui;
pub mod upload;

pub use disclosure::disclosure_routes;
pub use health::health_routes;
pub use sse::event_stream;
pub use ui::ui_routes;
pub use upload::upload_routes;
