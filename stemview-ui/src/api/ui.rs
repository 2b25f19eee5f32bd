//! UI routes: the page itself and its embedded assets

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use crate::view::page::{render_page, STEMVIEW_CSS, STEMVIEW_JS};
use crate::AppState;

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_page))
        .route("/static/stemview.css", get(serve_stemview_css))
        .route("/static/stemview.js", get(serve_stemview_js))
}

/// GET / - page for the current view
///
/// A reload shows whatever the last upload left behind.
async fn root_page(State(state): State<AppState>) -> Html<String> {
    let view = state.controller.view();
    let html = render_page(&*view.read().await);
    Html(html)
}

/// GET /static/stemview.css
async fn serve_stemview_css() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "text/css"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        STEMVIEW_CSS,
    )
        .into_response()
}

/// GET /static/stemview.js
async fn serve_stemview_js() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "application/javascript"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        STEMVIEW_JS,
    )
        .into_response()
}
