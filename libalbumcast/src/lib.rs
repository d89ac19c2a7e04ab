//! Albumcast - multi-platform album publishing for campaign sites
//!
//! This library takes one album's public share data and publishes it
//! concurrently to a selected subset of nine social platforms, with
//! outbound SSRF filtering, per-platform isolation, and request-order
//! result aggregation.

pub mod config;
pub mod error;
pub mod logging;
pub mod oauth1;
pub mod platforms;
pub mod publisher;
pub mod types;
pub mod url_filter;

// Re-export commonly used types
pub use config::Config;
pub use error::{AlbumcastError, Result};
pub use publisher::SocialPublisher;
pub use types::{AlbumShareData, Platform, ShareResult};
