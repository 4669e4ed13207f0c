//! The configuration manager.

use crate::core::merge::{completed, shallow_equal};
use crate::core::selector::{Selection, Selector, select_path_filling, set_path};
use crate::logging::Logger;
#[cfg(feature = "file-watch")]
use crate::notify::ConfigWatcher;
use crate::notify::{CallbackId, CallbackRegistry, FileEvent};
use crate::sources::{FileContents, JsonFile};
use arc_swap::ArcSwapOption;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// How long a watch-triggered read waits before re-reading a file that did
/// not parse, since the writer may still be between truncate and write.
const SETTLE_RETRY: Duration = Duration::from_millis(20);

/// Settings fixed at construction time.
pub(crate) struct ManagerOptions {
    pub(crate) config_name: String,
    pub(crate) config_dir: PathBuf,
    pub(crate) defaults: Map<String, Value>,
    pub(crate) logger: Arc<dyn Logger>,
    pub(crate) debug: bool,
    pub(crate) debounce: Duration,
    pub(crate) file_watch: bool,
}

struct Inner {
    options: ManagerOptions,
    /// Live configuration; `None` until the first load.
    current: ArcSwapOption<Value>,
    file: RwLock<Option<JsonFile>>,
    callbacks: CallbackRegistry,
    /// Text of the last silent write, until the next watch event consumes it.
    silent_write: Mutex<Option<String>>,
    /// Serializes read-modify-write cycles on `current` and the file.
    write_lock: Mutex<()>,
    #[cfg(feature = "file-watch")]
    watcher: Mutex<Option<ConfigWatcher>>,
}

/// Owner of a JSON configuration file.
///
/// Loads the file with the default shape filled in, persists changes, watches
/// the file for external edits and notifies subscribers. Reads go through an
/// `arc-swap` snapshot and never block. The handle is cheap to clone; clones
/// share the same state.
///
/// Failures never surface as errors here: a missing or corrupt file is
/// replaced with the defaults and write failures are logged, so callers always
/// have a usable configuration.
///
/// # Examples
///
/// ```rust,no_run
/// use settings_store::prelude::*;
/// use serde_json::json;
///
/// # async fn example() -> Result<()> {
/// let config = ConfigManager::builder()
///     .with_config_dir("./data")
///     .with_defaults(json!({ "java": { "path": "", "args": "" } }))
///     .build()?;
///
/// config.load(None);
/// config.set_option("java.args", "--version").await;
/// assert_eq!(config.get_option("java.args", false), Some(json!("--version")));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ConfigManager {
    inner: Arc<Inner>,
}

impl ConfigManager {
    pub(crate) fn with_options(options: ManagerOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                options,
                current: ArcSwapOption::empty(),
                file: RwLock::new(None),
                callbacks: CallbackRegistry::new(),
                silent_write: Mutex::new(None),
                write_lock: Mutex::new(()),
                #[cfg(feature = "file-watch")]
                watcher: Mutex::new(None),
            }),
        }
    }

    /// Whether a configuration is in memory.
    pub fn is_loaded(&self) -> bool {
        self.inner.current.load().is_some()
    }

    /// Location of the backing file, once [`load`](Self::load) has run.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.file().map(|file| file.path().to_path_buf())
    }

    /// Whether the backing file is being watched.
    pub fn is_watching(&self) -> bool {
        #[cfg(feature = "file-watch")]
        {
            self.inner.watcher.lock().is_some()
        }
        #[cfg(not(feature = "file-watch"))]
        {
            false
        }
    }

    /// Read (or create) the backing file and start watching it.
    ///
    /// `config_dir` overrides the directory given at construction. A missing
    /// or malformed file is replaced with the default configuration. Returns
    /// the loaded configuration.
    pub fn load(&self, config_dir: Option<&Path>) -> Option<Value> {
        let dir = config_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.inner.options.config_dir.clone());
        let file = JsonFile::new(dir.join(&self.inner.options.config_name));
        *self.inner.file.write() = Some(file.clone());

        self.read_config(&file, false);

        let loaded = self.is_loaded();
        self.inner.options.logger.debug(format_args!(
            "[load] {} file -> {}",
            self.inner.options.config_name,
            if loaded { "success" } else { "failure" }
        ));
        if loaded {
            self.start_watching(&file);
        }
        self.snapshot()
    }

    /// Persist the configuration.
    ///
    /// The configuration is shape-completed first and written only if that
    /// changed it or `force_save` is set. A silent save does not notify
    /// subscribers when the watcher sees the write. Returns whether a
    /// configuration is loaded, not whether anything was written.
    pub fn save(&self, silent: bool, force_save: bool, reason: &str) -> bool {
        let Some(file) = self.file() else {
            return false;
        };
        let _guard = self.inner.write_lock.lock();
        self.persist(&file, silent, force_save, reason)
    }

    /// Set the value at a dot-delimited key path and save.
    ///
    /// Missing intermediate objects are created. Returns `None` if nothing is
    /// loaded, the key is empty, or the value cannot be serialized.
    pub async fn set_option<V: Serialize>(&self, key: &str, value: V) -> Option<bool> {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                self.trace(format_args!("[setOption] {}: unsupported value: {}", key, e));
                return None;
            }
        };
        self.mutate("set option", |config| set_path(config, key, value))
    }

    /// Replace the whole configuration and save.
    ///
    /// Returns `None` if nothing is loaded or `config` is not a JSON object.
    pub async fn replace_options(&self, config: Value) -> Option<bool> {
        if !config.is_object() {
            return None;
        }
        self.mutate("set option", move |current| {
            *current = config;
            true
        })
    }

    /// Read part of the configuration.
    ///
    /// With `use_default` the default configuration is read instead. A path
    /// selector inserts empty objects for missing segments into the in-memory
    /// configuration without saving them. A failing accessor yields the whole
    /// state it was given. Returns `None` if nothing is loaded.
    pub fn get_option(&self, selector: impl Into<Selector>, use_default: bool) -> Option<Value> {
        self.select(selector, use_default).map(Selection::into_value)
    }

    /// Like [`get_option`](Self::get_option), but reports whether an accessor
    /// failed.
    pub fn select(&self, selector: impl Into<Selector>, use_default: bool) -> Option<Selection> {
        let current = self.inner.current.load_full()?;
        match selector.into() {
            Selector::Whole if use_default => Some(Selection::Value(self.default_value())),
            Selector::Whole => Some(Selection::Value((*current).clone())),
            Selector::Accessor(accessor) => {
                let state = if use_default {
                    self.default_value()
                } else {
                    (*current).clone()
                };
                Some(match accessor(&state) {
                    Some(value) => Selection::Value(value),
                    None => Selection::Recovered(state),
                })
            }
            Selector::Path(path) if use_default => {
                let mut state = self.default_value();
                select_path_filling(&mut state, &path).0.map(Selection::Value)
            }
            Selector::Path(path) => {
                let _guard = self.inner.write_lock.lock();
                let latest = self.inner.current.load_full().unwrap_or(current);
                let mut state = (*latest).clone();
                let (value, filled) = select_path_filling(&mut state, &path);
                if filled {
                    self.inner.current.store(Some(Arc::new(state)));
                }
                value.map(Selection::Value)
            }
        }
    }

    /// Read part of the configuration as a typed value.
    pub fn get_as<T: DeserializeOwned>(&self, selector: impl Into<Selector>) -> Option<T> {
        let value = self.get_option(selector, false)?;
        serde_json::from_value(value).ok()
    }

    /// Register a callback run with the configuration after every change.
    pub fn add_callback<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.inner.callbacks.add(callback)
    }

    /// Unregister a callback. Unknown ids are ignored.
    pub fn remove_callback(&self, id: CallbackId) -> bool {
        self.inner.callbacks.remove(id)
    }

    /// Watch a narrow slice of the configuration.
    ///
    /// See [`OptionWatch::subscribe`].
    pub fn watch_option(&self, selector: impl Into<Selector>) -> OptionWatch {
        OptionWatch {
            manager: self.clone(),
            selector: selector.into(),
        }
    }

    fn file(&self) -> Option<JsonFile> {
        self.inner.file.read().clone()
    }

    fn snapshot(&self) -> Option<Value> {
        self.inner.current.load_full().map(|config| (*config).clone())
    }

    fn default_value(&self) -> Value {
        Value::Object(self.inner.options.defaults.clone())
    }

    fn trace(&self, args: fmt::Arguments<'_>) {
        if self.inner.options.debug {
            self.inner.options.logger.debug(args);
        }
    }

    fn run_callbacks(&self) {
        if let Some(config) = self.inner.current.load_full() {
            self.inner.callbacks.notify_all(&config);
        }
    }

    /// Apply `change` to a copy of the configuration, then save it.
    fn mutate<F>(&self, reason: &str, change: F) -> Option<bool>
    where
        F: FnOnce(&mut Value) -> bool,
    {
        let file = self.file()?;
        let saved = {
            let _guard = self.inner.write_lock.lock();
            let current = self.inner.current.load_full()?;
            let mut next = (*current).clone();
            if !change(&mut next) {
                return None;
            }
            self.inner.current.store(Some(Arc::new(next)));
            self.persist(&file, false, true, reason)
        };
        // Without a watcher nobody would observe the write.
        if !self.is_watching() {
            self.run_callbacks();
        }
        Some(saved)
    }

    /// Read the file into memory, filling in defaults, and save if needed.
    ///
    /// The read happens under `write_lock` so it cannot interleave with a
    /// write from this manager. Returns the text read from disk when it parsed.
    fn read_config(&self, file: &JsonFile, settle: bool) -> Option<String> {
        let _guard = self.inner.write_lock.lock();
        let mut contents = file.read();
        if settle && matches!(contents, FileContents::Malformed(_)) {
            std::thread::sleep(SETTLE_RETRY);
            contents = file.read();
        }

        let (force_save, raw) = match contents {
            FileContents::Missing => {
                self.trace(format_args!("[read] Generating a new configuration file..."));
                if self.inner.current.load().is_none() {
                    self.inner.current.store(Some(Arc::new(self.default_value())));
                }
                (true, None)
            }
            FileContents::Malformed(e) => {
                self.inner.options.logger.warn(format_args!(
                    "Configuration file contains malformed JSON or is corrupted! ({})",
                    e
                ));
                self.inner.current.store(Some(Arc::new(self.default_value())));
                (true, None)
            }
            FileContents::Loaded { value, raw } => {
                self.inner.current.store(Some(Arc::new(value)));
                (false, Some(raw))
            }
        };
        self.persist(file, true, force_save, "read -> save");
        raw
    }

    /// Shape-complete and write the configuration. Callers hold `write_lock`.
    fn persist(&self, file: &JsonFile, silent: bool, force_save: bool, reason: &str) -> bool {
        let Some(current) = self.inner.current.load_full() else {
            return false;
        };

        let logger = &self.inner.options.logger;
        if let Err(e) = file.ensure_parent_dir() {
            logger.error(format_args!("[save] Could not create config directory: {}", e));
        }

        let validated = completed(&current, &self.inner.options.defaults);
        if !shallow_equal(&current, &validated) || force_save {
            match file.write(&validated) {
                Ok(written) => {
                    *self.inner.silent_write.lock() = silent.then_some(written);
                }
                Err(e) => logger.error(format_args!("[save] Config save error: {}", e)),
            }
            self.inner.current.store(Some(Arc::new(validated)));
            self.trace(format_args!(
                "[save] Config saved! Silent: {} Reason: {}",
                silent, reason
            ));
        }
        true
    }

    /// React to a debounced event on the backing file.
    #[cfg_attr(not(feature = "file-watch"), allow(dead_code))]
    pub(crate) fn handle_file_event(&self, event: FileEvent) {
        let Some(file) = self.file() else {
            return;
        };
        self.trace(format_args!(
            "[watchCallback] {} file -> {:?}",
            self.inner.options.config_name, event
        ));

        let pending_silent = self.inner.silent_write.lock().take();
        let raw = self.read_config(&file, true);

        if event == FileEvent::Change {
            if pending_silent.is_some() && pending_silent == raw {
                self.trace(format_args!("[watch] > silent change"));
            } else {
                self.trace(format_args!("[watch] > run callbacks"));
                self.run_callbacks();
            }
        }
    }

    #[cfg(feature = "file-watch")]
    fn start_watching(&self, file: &JsonFile) {
        if !self.inner.options.file_watch {
            return;
        }
        let weak = Arc::downgrade(&self.inner);
        let result = ConfigWatcher::start(file.path(), self.inner.options.debounce, move |event| {
            match weak.upgrade() {
                Some(inner) => {
                    ConfigManager { inner }.handle_file_event(event);
                    std::ops::ControlFlow::Continue(())
                }
                None => std::ops::ControlFlow::Break(()),
            }
        });
        match result {
            Ok(watcher) => *self.inner.watcher.lock() = Some(watcher),
            Err(e) => self.inner.options.logger.error(format_args!(
                "[load] Could not watch {}: {}",
                file.path().display(),
                e
            )),
        }
    }

    #[cfg(not(feature = "file-watch"))]
    fn start_watching(&self, _file: &JsonFile) {}
}

impl fmt::Debug for ConfigManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigManager")
            .field("config_name", &self.inner.options.config_name)
            .field("config_path", &self.config_path())
            .field("loaded", &self.is_loaded())
            .field("watching", &self.is_watching())
            .finish()
    }
}

/// A pending subscription to one slice of the configuration.
///
/// Created by [`ConfigManager::watch_option`].
pub struct OptionWatch {
    manager: ConfigManager,
    selector: Selector,
}

impl OptionWatch {
    /// Subscribe `callback` to the selected slice.
    ///
    /// The callback runs once right away with the current value, then again
    /// after each configuration change whose selected value is not shallowly
    /// equal to the one last delivered. The subscription does not keep the
    /// manager alive.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use settings_store::prelude::*;
    /// # fn example(config: ConfigManager) {
    /// config.watch_option("java.path").subscribe(|path| {
    ///     println!("java.path is now {path}");
    /// });
    /// # }
    /// ```
    pub fn subscribe<F>(self, callback: F) -> CallbackId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let weak = Arc::downgrade(&self.manager.inner);
        let selector = self.selector;
        let last: Mutex<Option<Value>> = Mutex::new(None);

        let update = move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let manager = ConfigManager { inner };
            let Some(next) = manager.get_option(selector.clone(), false) else {
                return;
            };
            manager.trace(format_args!(
                "[watchOption] Mapped: {:?} nextProps: {}",
                last.lock().as_ref().map(ToString::to_string),
                next
            ));

            let mut last = last.lock();
            if last.as_ref().is_some_and(|prev| shallow_equal(prev, &next)) {
                return;
            }
            *last = Some(next.clone());
            drop(last);
            callback(&next);
        };

        update();
        self.manager.add_callback(move |_| update())
    }
}
