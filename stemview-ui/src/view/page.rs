//! Full HTML documents
//!
//! `render_page` is the live page served at `/` (upload form, SSE progress,
//! server-side toggles). `render_report` is a standalone file written by
//! `stemview analyze`: styles inlined, every disclosure panel expanded.

use super::{PageView, ResultsPanel};
use crate::render::html::escape;

/// Shared stylesheet, also served at /static/stemview.css
pub const STEMVIEW_CSS: &str = include_str!("../../ui/stemview.css");

/// Client script, served at /static/stemview.js
pub const STEMVIEW_JS: &str = include_str!("../../ui/stemview.js");

/// Toggles in a report only flip visibility; content is already there
const REPORT_TOGGLE_JS: &str = r#"document.querySelectorAll('.disclosure-toggle').forEach(function (button) {
    button.addEventListener('click', function () {
        var panel = button.parentElement.querySelector('.disclosure-panel');
        if (!panel) { return; }
        var hidden = panel.style.display === 'none';
        panel.style.display = hidden ? 'block' : 'none';
        button.setAttribute('aria-expanded', hidden ? 'true' : 'false');
        button.textContent = hidden ? '🔼 Hide Instruments' : '🔍 View Detected Instruments';
    });
});"#;

fn build_info_html() -> String {
    format!(
        r#"<div class="header-right">
                <div class="build-info-line">stemview v{}</div>
                <div class="build-info-line">{} ({})</div>
                <div class="build-info-line">{}</div>
            </div>"#,
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_PROFILE"),
        env!("BUILD_TIMESTAMP")
    )
}

/// GET / document
pub fn render_page(view: &PageView) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>stemview - Audio Analysis</title>
    <link rel="stylesheet" href="/static/stemview.css">
</head>
<body>
    <header>
        <div class="header-content">
            <div class="header-left">
                <h1>
                    🎧 stemview
                    <span class="connection-status" id="connection-status">Connecting...</span>
                </h1>
                <p class="subtitle">Instrument classification and stem separation</p>
            </div>
            {build_info}
        </div>
    </header>
    <div class="content">
        <form id="uploadForm" class="upload-form" method="post" action="/upload" enctype="multipart/form-data">
            <input type="file" id="audioFile" name="file" accept="audio/*">
            <button type="submit" id="uploadBtn" class="button">Upload &amp; Analyze</button>
        </form>
        <div id="status" class="status-region">{status}</div>
        <div id="stems" class="results-region">{results}</div>
    </div>
    <script src="/static/stemview.js"></script>
</body>
</html>
"#,
        build_info = build_info_html(),
        status = view.status_html(),
        results = view.results_html(),
    )
}

/// Standalone report document for `source_name`
pub fn render_report(view: &PageView, source_name: &str) -> String {
    let results = match view.results() {
        Some(ResultsPanel::Stems(panel)) => {
            let mut expanded = panel.clone();
            expanded.expand_all();
            expanded.render_html()
        }
        Some(panel) => panel.render_html(),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>stemview report - {name}</title>
    <style>
{css}
    </style>
</head>
<body>
    <header>
        <div class="header-content">
            <div class="header-left">
                <h1>🎧 stemview report</h1>
                <p class="subtitle">{name}</p>
            </div>
            {build_info}
        </div>
    </header>
    <div class="content">
        <div id="status" class="status-region">{status}</div>
        <div id="stems" class="results-region">{results}</div>
    </div>
    <script>
{toggle_js}
    </script>
</body>
</html>
"#,
        name = escape(source_name),
        css = STEMVIEW_CSS,
        build_info = build_info_html(),
        status = view.status_html(),
        results = results,
        toggle_js = REPORT_TOGGLE_JS,
    )
}
