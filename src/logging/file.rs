//! Size-rotated file logger.

use super::Logger;
use parking_lot::Mutex;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy)]
enum Level {
    Error,
    Warn,
    Info,
    Debug,
    Silly,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Silly => "silly",
        }
    }
}

/// Logger appending to a file that is rotated once it grows past a limit.
///
/// Lines look like `[2026-10-18 09:15:02.118] [info] [ConfigManager] text`.
/// When the file reaches the size limit it is renamed to `<name>.old<.ext>`
/// (replacing any previous `.old` file) and a fresh file is started. Every
/// line is also emitted through `tracing` for console output.
///
/// # Examples
///
/// ```rust,no_run
/// use settings_store::logging::{FileLogger, Logger};
///
/// let logger = FileLogger::new("[Launcher]", "logs/main.log").with_max_size(64 * 1024);
/// logger.info(format_args!("launcher started"));
/// ```
#[derive(Debug)]
pub struct FileLogger {
    prefix: String,
    path: PathBuf,
    max_size: u64,
    console: bool,
    write_lock: Mutex<()>,
}

impl FileLogger {
    /// Default log file location.
    pub const DEFAULT_PATH: &'static str = "logs/main.log";

    /// Default rotation threshold in bytes.
    pub const DEFAULT_MAX_SIZE: u64 = 1024;

    /// Create a logger writing to `path`.
    pub fn new(prefix: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            path: path.into(),
            max_size: Self::DEFAULT_MAX_SIZE,
            console: true,
            write_lock: Mutex::new(()),
        }
    }

    /// Set the size, in bytes, at which the file is rotated.
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    /// Enable or disable mirroring to `tracing`.
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    /// The active log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the rotated file goes: `logs/main.log` -> `logs/main.old.log`.
    pub fn rotated_path(&self) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match self.path.extension() {
            Some(ext) => format!("{}.old.{}", stem, ext.to_string_lossy()),
            None => format!("{}.old", stem),
        };
        self.path.with_file_name(name)
    }

    fn write(&self, level: Level, args: fmt::Arguments<'_>) {
        let message = args.to_string();
        if self.console {
            match level {
                Level::Error => tracing::error!(prefix = %self.prefix, "{}", message),
                Level::Warn => tracing::warn!(prefix = %self.prefix, "{}", message),
                Level::Info => tracing::info!(prefix = %self.prefix, "{}", message),
                Level::Debug => tracing::debug!(prefix = %self.prefix, "{}", message),
                Level::Silly => tracing::trace!(prefix = %self.prefix, "{}", message),
            }
        }

        let line = format!(
            "[{}] [{}] {} {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            level.as_str(),
            self.prefix,
            message
        );

        let _guard = self.write_lock.lock();
        self.rotate_if_needed();
        if let Err(e) = self.append(&line) {
            tracing::warn!(path = %self.path.display(), error = %e, "Could not write log file");
        }
    }

    fn rotate_if_needed(&self) {
        let Ok(metadata) = fs::metadata(&self.path) else {
            return;
        };
        if metadata.len() < self.max_size {
            return;
        }
        if let Err(e) = fs::rename(&self.path, self.rotated_path()) {
            tracing::warn!(path = %self.path.display(), error = %e, "Could not rotate log");
        }
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())
    }
}

impl Default for FileLogger {
    fn default() -> Self {
        Self::new(super::DEFAULT_PREFIX, Self::DEFAULT_PATH)
    }
}

impl Logger for FileLogger {
    fn error(&self, args: fmt::Arguments<'_>) {
        self.write(Level::Error, args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        self.write(Level::Warn, args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        self.write(Level::Info, args);
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        self.write(Level::Debug, args);
    }

    fn silly(&self, args: fmt::Arguments<'_>) {
        self.write(Level::Silly, args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_line_format() {
        let temp_dir = TempDir::new().unwrap();
        let logger =
            FileLogger::new("[Test]", temp_dir.path().join("main.log")).with_console(false);

        logger.info(format_args!("hello {}", "world"));

        let content = fs::read_to_string(logger.path()).unwrap();
        assert!(content.starts_with('['));
        assert!(content.ends_with("] [info] [Test] hello world\n"));
    }

    #[test]
    fn test_creates_log_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logs").join("main.log");
        let logger = FileLogger::new("[Test]", &path).with_console(false);

        logger.warn(format_args!("careful"));
        assert!(path.exists());
    }

    #[test]
    fn test_rotated_path() {
        let logger = FileLogger::new("[Test]", "logs/main.log");
        assert_eq!(logger.rotated_path(), PathBuf::from("logs/main.old.log"));

        let logger = FileLogger::new("[Test]", "logs/main");
        assert_eq!(logger.rotated_path(), PathBuf::from("logs/main.old"));
    }

    #[test]
    fn test_rotation_at_size_limit() {
        let temp_dir = TempDir::new().unwrap();
        let logger = FileLogger::new("[Test]", temp_dir.path().join("main.log"))
            .with_max_size(16)
            .with_console(false);

        logger.info(format_args!("first line, long enough to pass the limit"));
        assert!(!logger.rotated_path().exists());

        logger.error(format_args!("second"));
        assert!(logger.rotated_path().exists());

        let old = fs::read_to_string(logger.rotated_path()).unwrap();
        let current = fs::read_to_string(logger.path()).unwrap();
        assert!(old.contains("first line"));
        assert!(current.contains("[error] [Test] second"));
        assert!(!current.contains("first line"));
    }

    #[test]
    fn test_default_location() {
        let logger = FileLogger::default();
        assert_eq!(logger.path(), Path::new("logs/main.log"));
    }
}
