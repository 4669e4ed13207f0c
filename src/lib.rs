//! # settings-store
//!
//! A single JSON settings file kept in memory, completed against a default
//! shape, persisted on change and watched for external edits.
//!
//! ## Overview
//!
//! `settings-store` owns one configuration file for an application:
//! - Missing keys are filled in from a default configuration on every load and save
//! - A missing or corrupt file is replaced with the defaults
//! - Reads are lock-free snapshots through `arc-swap`
//! - External edits to the file are picked up and announced to subscribers
//! - Subscribers can watch a narrow slice of the configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use settings_store::prelude::*;
//! use serde_json::json;
//!
//! # async fn example() -> settings_store::error::Result<()> {
//! let config = ConfigManager::builder()
//!     .with_config_name("config.json")
//!     .with_config_dir("./data")
//!     .with_defaults(json!({
//!         "java": { "path": "", "memory": { "max": 1024, "min": 512 }, "args": "" },
//!         "minecraft": { "autoConnect": false }
//!     }))
//!     .build()?;
//!
//! // Creates ./data/config.json if needed
//! config.load(None);
//!
//! config.add_callback(|cfg| println!("config changed: {cfg}"));
//! config.set_option("java.memory.max", 2048).await;
//!
//! let max: Option<u32> = config.get_as("java.memory.max");
//! println!("max memory: {max:?}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `file-watch` (default): watch the backing file with `notify` and
//!   dispatch events on `tokio`. Without it, callbacks run directly after
//!   each change made through the manager.

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod logging;
pub mod notify;
pub mod paths;
pub mod sources;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{ConfigManager, ConfigManagerBuilder, OptionWatch, Selection, Selector};
    pub use crate::error::{ConfigError, Result};
    pub use crate::logging::{FileLogger, Logger, TracingLogger};
    pub use crate::notify::CallbackId;
}
