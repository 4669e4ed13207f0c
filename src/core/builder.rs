//! Builder for constructing ConfigManager instances.

use crate::core::ConfigManager;
use crate::core::manager::ManagerOptions;
use crate::error::{ConfigError, Result, kind_of};
use crate::logging::{DEFAULT_PREFIX, Logger, TracingLogger};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// File name used when none is given.
pub const DEFAULT_CONFIG_NAME: &str = "config.json";

/// Directory used when none is given.
pub const DEFAULT_CONFIG_DIR: &str = "./";

/// Window within which repeated file events are collapsed into one.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Builder for constructing a [`ConfigManager`].
///
/// Only the default configuration is required.
///
/// # Examples
///
/// ```rust,no_run
/// use settings_store::prelude::*;
/// use serde_json::json;
///
/// # fn example() -> Result<()> {
/// let config = ConfigManager::builder()
///     .with_config_name("launcher.json")
///     .with_config_dir("./data")
///     .with_defaults(json!({
///         "java": { "path": "", "memory": { "max": 1024, "min": 512 } },
///         "minecraft": { "autoConnect": false }
///     }))
///     .with_debug(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ConfigManagerBuilder {
    config_name: Option<String>,
    config_dir: PathBuf,
    defaults: Option<Result<Value>>,
    logger: Option<Arc<dyn Logger>>,
    debug: bool,
    debounce: Duration,
    file_watch: bool,
}

impl ConfigManagerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config_name: None,
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            defaults: None,
            logger: None,
            debug: false,
            debounce: DEFAULT_DEBOUNCE,
            file_watch: true,
        }
    }

    /// Name of the backing file. Empty names fall back to `config.json`.
    pub fn with_config_name(mut self, name: impl Into<String>) -> Self {
        self.config_name = Some(name.into());
        self
    }

    /// Directory holding the backing file, `./` by default.
    ///
    /// [`ConfigManager::load`] can override it.
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    /// The default configuration. Must be a JSON object.
    pub fn with_defaults(mut self, defaults: Value) -> Self {
        self.defaults = Some(Ok(defaults));
        self
    }

    /// The default configuration, serialized from any `Serialize` value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use settings_store::prelude::*;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct Java { path: String, args: String }
    ///
    /// #[derive(Serialize)]
    /// struct Launcher { java: Java }
    ///
    /// let builder = ConfigManager::builder().with_defaults_from(&Launcher {
    ///     java: Java { path: String::new(), args: String::new() },
    /// });
    /// assert!(builder.with_file_watch(false).build().is_ok());
    /// ```
    pub fn with_defaults_from<T: Serialize + ?Sized>(mut self, defaults: &T) -> Self {
        self.defaults = Some(serde_json::to_value(defaults).map_err(ConfigError::from));
        self
    }

    /// Logger receiving the manager's diagnostics.
    ///
    /// Defaults to a disabled [`TracingLogger`] with the `[ConfigManager]`
    /// prefix, so a manager is silent unless given a logger.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Emit verbose diagnostics through the logger.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Debounce window for file events, 100ms by default.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Watch the backing file after loading (on by default).
    ///
    /// Has no effect without the `file-watch` feature.
    pub fn with_file_watch(mut self, enabled: bool) -> Self {
        self.file_watch = enabled;
        self
    }

    /// Build the manager. Nothing is read from disk until
    /// [`ConfigManager::load`].
    ///
    /// # Errors
    ///
    /// Returns an error if no defaults were given, they failed to serialize,
    /// or they are not a JSON object.
    pub fn build(self) -> Result<ConfigManager> {
        let defaults = match self.defaults.ok_or(ConfigError::MissingDefaults)?? {
            Value::Object(map) => map,
            other => return Err(ConfigError::InvalidDefaults(kind_of(&other))),
        };

        let config_name = self
            .config_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_NAME.to_string());

        let logger = self.logger.unwrap_or_else(|| Arc::new(default_logger()));

        Ok(ConfigManager::with_options(ManagerOptions {
            config_name,
            config_dir: self.config_dir,
            defaults,
            logger,
            debug: self.debug,
            debounce: self.debounce,
            file_watch: self.file_watch,
        }))
    }
}

fn default_logger() -> TracingLogger {
    TracingLogger::disabled(DEFAULT_PREFIX)
}

impl Default for ConfigManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Create a new builder for constructing a manager.
    pub fn builder() -> ConfigManagerBuilder {
        ConfigManagerBuilder::new()
    }

    /// Manager for `./config.json` with the given defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `defaults` is not a JSON object.
    pub fn new(defaults: Value) -> Result<Self> {
        Self::builder().with_defaults(defaults).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_builder_requires_defaults() {
        let result = ConfigManagerBuilder::new().build();
        assert!(matches!(result, Err(ConfigError::MissingDefaults)));
    }

    #[test]
    fn test_builder_rejects_non_object_defaults() {
        let result = ConfigManagerBuilder::new().with_defaults(json!([1, 2])).build();
        assert!(matches!(result, Err(ConfigError::InvalidDefaults("an array"))));
    }

    #[test]
    fn test_builder_defaults() {
        let builder = ConfigManagerBuilder::new();
        assert_eq!(builder.config_dir, PathBuf::from("./"));
        assert_eq!(builder.debounce, Duration::from_millis(100));
        assert!(builder.file_watch);
        assert!(!builder.debug);
    }

    #[test]
    fn test_default_logger_is_disabled() {
        let logger = default_logger();
        assert!(logger.is_disabled());
        assert_eq!(logger.prefix(), DEFAULT_PREFIX);
    }

    #[test]
    fn test_empty_config_name_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigManagerBuilder::new()
            .with_config_name("")
            .with_config_dir(temp_dir.path())
            .with_defaults(json!({}))
            .with_file_watch(false)
            .build()
            .unwrap();

        config.load(None);
        assert_eq!(
            config.config_path(),
            Some(temp_dir.path().join(DEFAULT_CONFIG_NAME))
        );
    }

    #[test]
    fn test_with_defaults_from_struct() {
        #[derive(Serialize)]
        struct Window {
            width: u32,
            height: u32,
        }

        let temp_dir = TempDir::new().unwrap();
        let config = ConfigManagerBuilder::new()
            .with_config_dir(temp_dir.path())
            .with_defaults_from(&Window {
                width: 1280,
                height: 720,
            })
            .with_file_watch(false)
            .build()
            .unwrap();

        assert_eq!(config.load(None), Some(json!({"width": 1280, "height": 720})));
    }

    #[test]
    fn test_new_uses_current_directory() {
        let config = ConfigManager::new(json!({"a": 1})).unwrap();
        assert!(!config.is_loaded());
        assert!(ConfigManager::new(json!(5)).is_err());
    }
}
