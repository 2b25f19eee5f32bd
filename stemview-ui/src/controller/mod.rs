//! Upload lifecycle control
//!
//! - **upload**: `UploadController`, one request per user action
//! - **progress**: decorative progress ticker run beside the request

pub mod progress;
pub mod upload;

pub use progress::ProgressTicker;
pub use upload::{ToggleOutcome, UploadController, UploadOutcome, NO_FILE_MESSAGE};
