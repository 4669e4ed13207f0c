//! Logger capability consumed by the configuration manager.
//!
//! The manager only talks to the [`Logger`] trait. [`TracingLogger`] forwards
//! to `tracing`; a manager built without a logger gets a disabled one.
//! [`FileLogger`] writes a size-rotated log file and mirrors each line to
//! `tracing`.

mod file;

pub use file::FileLogger;

use std::fmt;

/// Prefix used by the default logger.
pub const DEFAULT_PREFIX: &str = "[ConfigManager]";

/// Sink for the manager's diagnostics.
///
/// # Examples
///
/// ```rust
/// use settings_store::logging::Logger;
/// use std::fmt;
///
/// struct Stderr;
///
/// impl Logger for Stderr {
///     fn error(&self, args: fmt::Arguments<'_>) { eprintln!("error: {args}"); }
///     fn warn(&self, args: fmt::Arguments<'_>) { eprintln!("warn: {args}"); }
///     fn info(&self, args: fmt::Arguments<'_>) { eprintln!("info: {args}"); }
///     fn debug(&self, args: fmt::Arguments<'_>) { eprintln!("debug: {args}"); }
/// }
///
/// Stderr.warn(format_args!("Configuration file contains malformed JSON"));
/// ```
pub trait Logger: Send + Sync {
    /// Log an error.
    fn error(&self, args: fmt::Arguments<'_>);

    /// Log a warning.
    fn warn(&self, args: fmt::Arguments<'_>);

    /// Log an informational message.
    fn info(&self, args: fmt::Arguments<'_>);

    /// Log a diagnostic message.
    fn debug(&self, args: fmt::Arguments<'_>);

    /// Log a very verbose message. Defaults to [`Logger::debug`].
    fn silly(&self, args: fmt::Arguments<'_>) {
        self.debug(args);
    }

    /// Log a plain message. Defaults to [`Logger::info`].
    fn log(&self, args: fmt::Arguments<'_>) {
        self.info(args);
    }
}

/// Logger that forwards to the `tracing` macros.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    prefix: String,
    disabled: bool,
}

impl TracingLogger {
    /// Create an enabled logger tagging every event with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            disabled: false,
        }
    }

    /// Create a logger that drops everything.
    pub fn disabled(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            disabled: true,
        }
    }

    /// Tag attached to every event.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether events are dropped.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl Logger for TracingLogger {
    fn error(&self, args: fmt::Arguments<'_>) {
        if !self.disabled {
            tracing::error!(prefix = %self.prefix, "{}", args);
        }
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        if !self.disabled {
            tracing::warn!(prefix = %self.prefix, "{}", args);
        }
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        if !self.disabled {
            tracing::info!(prefix = %self.prefix, "{}", args);
        }
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        if !self.disabled {
            tracing::debug!(prefix = %self.prefix, "{}", args);
        }
    }

    fn silly(&self, args: fmt::Arguments<'_>) {
        if !self.disabled {
            tracing::trace!(prefix = %self.prefix, "{}", args);
        }
    }
}
