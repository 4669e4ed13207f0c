//! Configuration change notification system.
//!
//! Provides the callback registry, a leading-edge debouncer, and (with the
//! `file-watch` feature) the file watcher that drives reloads.

pub mod debounce;
pub mod subscriber;
#[cfg(feature = "file-watch")]
pub mod watcher;

pub use debounce::Debouncer;
pub use subscriber::{Callback, CallbackId, CallbackRegistry};
#[cfg(feature = "file-watch")]
pub use watcher::ConfigWatcher;

/// Kind of change observed on the watched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEvent {
    /// The file's contents were modified.
    Change,
    /// The file was created, removed, or renamed.
    Rename,
}
