//! Callback registry for configuration changes.

use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// Callback invoked with a snapshot of the configuration.
pub type Callback = Arc<dyn Fn(&Value) + Send + Sync>;

/// Identifies a registered callback so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(usize);

/// Internal registry state.
struct CallbackRegistryInner {
    callbacks: Vec<(CallbackId, Callback)>,
    next_id: usize,
}

/// Insertion-ordered registry of configuration callbacks.
///
/// Callbacks run outside the registry lock, so a callback may itself add or
/// remove callbacks; such changes take effect from the next notification.
///
/// # Examples
///
/// ```rust
/// use settings_store::notify::CallbackRegistry;
/// use serde_json::json;
///
/// let registry = CallbackRegistry::new();
/// let id = registry.add(|cfg| println!("Config changed: {cfg}"));
///
/// registry.notify_all(&json!({ "java": { "path": "" } }));
/// registry.remove(id);
/// ```
pub struct CallbackRegistry {
    inner: Arc<Mutex<CallbackRegistryInner>>,
}

impl CallbackRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(CallbackRegistryInner {
                callbacks: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Register a callback at the end of the list.
    pub fn add<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock();
        let id = CallbackId(inner.next_id);
        inner.next_id += 1;
        inner.callbacks.push((id, Arc::new(callback)));
        id
    }

    /// Unregister a callback. Unknown ids are ignored.
    ///
    /// Returns `true` if a callback was removed.
    pub fn remove(&self, id: CallbackId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.callbacks.len();
        inner.callbacks.retain(|(cb_id, _)| *cb_id != id);
        inner.callbacks.len() != before
    }

    /// Invoke every callback, in registration order, with `config`.
    pub fn notify_all(&self, config: &Value) {
        let callbacks: Vec<Callback> = self
            .inner
            .lock()
            .callbacks
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in callbacks {
            callback(config);
        }
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.inner.lock().callbacks.len()
    }

    /// Whether no callbacks are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CallbackRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
