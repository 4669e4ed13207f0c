//! Option selectors and dot-path addressing.

use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Accessor function deriving a value from a configuration snapshot.
///
/// Returning `None` means the accessor could not produce a value.
pub type Accessor = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

/// Chooses which part of the configuration to read.
///
/// # Examples
///
/// ```rust
/// use settings_store::core::Selector;
///
/// let whole = Selector::Whole;
/// let path = Selector::path("java.memory.max");
/// let derived = Selector::accessor(|cfg| cfg.get("java")?.get("memory").cloned());
/// # let _ = (whole, path, derived);
/// ```
#[derive(Clone, Default)]
pub enum Selector {
    /// The whole configuration.
    #[default]
    Whole,
    /// A dot-delimited key path such as `java.memory.max`.
    Path(String),
    /// A function of the configuration snapshot.
    Accessor(Accessor),
}

impl Selector {
    /// Select a dot-delimited key path.
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    /// Select through an accessor function.
    pub fn accessor<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        Self::Accessor(Arc::new(f))
    }
}

impl From<&str> for Selector {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for Selector {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whole => write!(f, "Whole"),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Accessor(_) => write!(f, "Accessor(..)"),
        }
    }
}

/// Outcome of evaluating a [`Selector`].
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// The selector produced a value.
    Value(Value),
    /// The accessor failed; this is the state it was given.
    Recovered(Value),
}

impl Selection {
    /// The selected value, or the recovered state.
    pub fn into_value(self) -> Value {
        match self {
            Self::Value(value) | Self::Recovered(value) => value,
        }
    }

    /// Whether the accessor failed and the prior state was returned.
    pub fn is_recovered(&self) -> bool {
        matches!(self, Self::Recovered(_))
    }
}

/// Set `value` at a dot-delimited `path`, creating intermediate objects.
///
/// Intermediate segments that are missing, or hold anything other than an
/// object, are replaced with an empty object. Returns `false` if the path is
/// empty or `root` is not an object.
pub fn set_path(root: &mut Value, path: &str, value: Value) -> bool {
    if path.is_empty() {
        return false;
    }
    let mut current = match root {
        Value::Object(map) => map,
        _ => return false,
    };

    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value);
            return true;
        }
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(next) = slot else {
            return false;
        };
        current = next;
    }
    false
}

/// Read the value at a dot-delimited `path`, inserting empty objects for
/// missing segments along the way.
///
/// Returns `None` when a segment holds a non-object value that cannot be
/// descended into. The second element reports whether placeholders were added.
pub fn select_path_filling(root: &mut Value, path: &str) -> (Option<Value>, bool) {
    let mut filled = false;
    let mut current = root;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => {
                if !map.contains_key(segment) {
                    map.insert(segment.to_string(), Value::Object(Map::new()));
                    filled = true;
                }
                match map.get_mut(segment) {
                    Some(next) => next,
                    None => return (None, filled),
                }
            }
            _ => return (None, filled),
        };
    }
    (Some(current.clone()), filled)
}
