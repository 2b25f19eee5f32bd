//! Media URL resolution
//!
//! The backend returns stem and upload locations as paths relative to its
//! own origin (`/stems/drums.wav`). The page loads them straight from the
//! backend, so they are resolved against the same origin used for uploads.

/// Resolve a backend media path against `base_url`
///
/// Absolute `http://` / `https://` URLs are returned unchanged.
pub fn resolve_media_url(base_url: &str, path: &str) -> String {
    let path = path.trim();
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }

    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}
