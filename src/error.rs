//! Error types for settings-store.

/// Result type alias for settings-store operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when working with the settings file.
///
/// Runtime operations on [`ConfigManager`](crate::core::ConfigManager) heal
/// themselves and only log these; they surface to callers when building a
/// manager or when using the lower-level [`sources`](crate::sources) and
/// [`notify`](crate::notify) pieces directly.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The builder was not given a default configuration.
    #[error("A default configuration is required")]
    MissingDefaults,

    /// The default configuration is not a JSON object.
    #[error("Default configuration must be a JSON object, got {0}")]
    InvalidDefaults(&'static str),

    /// File watching failed to initialize.
    #[error("File watching error: {0}")]
    WatchError(String),

    /// IO error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Failed to serialize a value to JSON.
    #[error("Failed to serialize configuration: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Name of a JSON value's kind, used in error messages.
pub(crate) fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invalid_defaults_message() {
        let err = ConfigError::InvalidDefaults(kind_of(&json!([1, 2])));
        assert_eq!(
            err.to_string(),
            "Default configuration must be a JSON object, got an array"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ConfigError = io.into();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
