//! # stemview Common Library
//!
//! Shared code for the stemview workspace:
//! - Error type shared by configuration and I/O helpers
//! - Bootstrap configuration loading (TOML + environment)
//! - View event types (ViewEvent enum) and the broadcast EventBus

pub mod config;
pub mod error;
pub mod events;

pub use error::{Error, Result};
pub use events::{EventBus, ViewEvent};
