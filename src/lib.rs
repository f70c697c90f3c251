//! Async client SDK for the Lacework REST API
//!
//! ```no_run
//! # async fn run() -> lacework_sdk::Result<()> {
//! use lacework_sdk::LaceworkClient;
//!
//! let client = LaceworkClient::builder("example")
//!     .api_keys("EXAMPLE_1234567890ABCDE", "_abcdef1234567890")
//!     .build()?;
//!
//! for channel in client.alert_channels().list().await? {
//!     println!("{} {} {}", channel.id(), channel.kind(), channel.common.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use client::{ApiVersion, ClientBuilder, LaceworkClient, LifecycleCallbacks, LogLevel};
pub use config::{Config, Profile};
pub use error::{ApiError, ConfigError, Error, Result};
