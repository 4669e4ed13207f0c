//! JSON file backing a configuration.

use crate::error::{ConfigError, Result, kind_of};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// What was found at the backing file's location.
#[derive(Debug)]
pub enum FileContents {
    /// No file exists yet.
    Missing,
    /// The file exists but is unreadable, not JSON, or not a JSON object.
    Malformed(ConfigError),
    /// The file parsed to a JSON object.
    Loaded {
        /// Parsed configuration.
        value: Value,
        /// Text exactly as read from disk.
        raw: String,
    },
}

/// A JSON configuration file on disk.
///
/// Files are written UTF-8, pretty-printed with four-space indentation.
///
/// # Examples
///
/// ```rust,no_run
/// use settings_store::sources::{FileContents, JsonFile};
///
/// let file = JsonFile::new("./config.json");
/// match file.read() {
///     FileContents::Loaded { value, .. } => println!("{value}"),
///     FileContents::Missing => println!("first run"),
///     FileContents::Malformed(e) => eprintln!("{e}"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    /// Create a handle for the file at `path`. Nothing is touched on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file.
    pub fn read(&self) -> FileContents {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return FileContents::Missing,
            Err(e) => return FileContents::Malformed(e.into()),
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(value @ Value::Object(_)) => FileContents::Loaded { value, raw },
            Ok(other) => FileContents::Malformed(ConfigError::ParseError(format!(
                "expected a JSON object at the top level, found {}",
                kind_of(&other)
            ))),
            Err(e) => FileContents::Malformed(ConfigError::ParseError(e.to_string())),
        }
    }

    /// Create the containing directory, recursively, if it is missing.
    pub fn ensure_parent_dir(&self) -> Result<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
                fs::create_dir_all(parent)?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Write `value` to the file and return the text that was written.
    pub fn write(&self, value: &Value) -> Result<String> {
        let content = to_pretty_json(value)?;
        fs::write(&self.path, &content)?;
        Ok(content)
    }
}

/// Serialize `value` as JSON indented with four spaces.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| ConfigError::ParseError(e.to_string()))
}
