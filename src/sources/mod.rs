//! Backing storage for the configuration.

pub mod file;

pub use file::{FileContents, JsonFile, to_pretty_json};
