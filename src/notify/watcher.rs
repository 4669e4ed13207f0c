//! File watching for automatic configuration reloads.

use crate::error::{ConfigError, Result};
use crate::notify::{Debouncer, FileEvent};
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use parking_lot::Mutex;
use std::ffi::OsString;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

fn classify(kind: &EventKind) -> Option<FileEvent> {
    match kind {
        EventKind::Modify(ModifyKind::Name(_)) | EventKind::Create(_) | EventKind::Remove(_) => {
            Some(FileEvent::Rename)
        }
        EventKind::Modify(_) | EventKind::Any => Some(FileEvent::Change),
        EventKind::Access(_) | EventKind::Other => None,
    }
}

/// Watches a single file and hands debounced events to a handler.
///
/// The containing directory is watched non-recursively so that editors which
/// replace the file instead of rewriting it are still observed; events for
/// other files in that directory are dropped. The handler runs on the
/// current `tokio` runtime's blocking pool when there is one, otherwise on a
/// dedicated thread. Dropping the watcher stops dispatching.
///
/// # Examples
///
/// ```rust,no_run
/// use settings_store::notify::ConfigWatcher;
/// use std::ops::ControlFlow;
/// use std::time::Duration;
///
/// # fn example() -> settings_store::error::Result<()> {
/// let watcher = ConfigWatcher::start("./config.json", Duration::from_millis(100), |event| {
///     println!("config.json: {:?}", event);
///     ControlFlow::Continue(())
/// })?;
/// # drop(watcher);
/// # Ok(())
/// # }
/// ```
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    path: PathBuf,
    debounce_duration: Duration,
}

impl ConfigWatcher {
    /// Start watching `path`.
    ///
    /// The handler runs once per burst of events; returning
    /// `ControlFlow::Break` stops dispatching for good.
    ///
    /// # Errors
    ///
    /// Returns an error if the path has no file name, its directory cannot be
    /// resolved, or the underlying watcher cannot be created.
    pub fn start<H>(
        path: impl AsRef<Path>,
        debounce_duration: Duration,
        handler: H,
    ) -> Result<Self>
    where
        H: FnMut(FileEvent) -> ControlFlow<()> + Send + 'static,
    {
        let path = path.as_ref().to_path_buf();
        let file_name: OsString = path
            .file_name()
            .ok_or_else(|| {
                ConfigError::WatchError(format!("No file name in path: {}", path.display()))
            })?
            .to_os_string();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let dir = dir
            .canonicalize()
            .map_err(|e| ConfigError::WatchError(format!("Failed to resolve path: {}", e)))?;

        let (event_tx, event_rx) = mpsc::unbounded_channel::<FileEvent>();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                let ours = event
                    .paths
                    .iter()
                    .any(|p| p.file_name() == Some(file_name.as_os_str()));
                if !ours {
                    return;
                }
                if let Some(kind) = classify(&event.kind) {
                    let _ = event_tx.send(kind);
                }
            }
            Err(e) => tracing::warn!(error = %e, "File watcher reported an error"),
        })
        .map_err(|e| ConfigError::WatchError(format!("Failed to create file watcher: {}", e)))?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| ConfigError::WatchError(format!("Failed to watch path: {}", e)))?;

        spawn_dispatch(event_rx, Debouncer::new(debounce_duration), handler);
        tracing::debug!(path = %path.display(), "Config watcher started");

        Ok(Self {
            _watcher: watcher,
            path,
            debounce_duration,
        })
    }

    /// The watched file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the debounce duration for this watcher.
    pub fn debounce_duration(&self) -> Duration {
        self.debounce_duration
    }
}

fn spawn_dispatch<H>(
    mut event_rx: mpsc::UnboundedReceiver<FileEvent>,
    mut debouncer: Debouncer,
    mut handler: H,
) where
    H: FnMut(FileEvent) -> ControlFlow<()> + Send + 'static,
{
    let mut dispatch = move |event: FileEvent| {
        if debouncer.should_fire(Instant::now()) {
            handler(event)
        } else {
            ControlFlow::Continue(())
        }
    };

    match tokio::runtime::Handle::try_current() {
        Ok(runtime) => {
            // Handlers do blocking file I/O, so they run on the blocking pool.
            let dispatch = Arc::new(Mutex::new(dispatch));
            runtime.spawn(async move {
                while let Some(event) = event_rx.recv().await {
                    let dispatch = Arc::clone(&dispatch);
                    let flow = tokio::task::spawn_blocking(move || {
                        let mut dispatch = dispatch.lock();
                        (&mut *dispatch)(event)
                    })
                    .await;
                    if !matches!(flow, Ok(ControlFlow::Continue(()))) {
                        break;
                    }
                }
            });
        }
        Err(_) => {
            std::thread::spawn(move || {
                while let Some(event) = event_rx.blocking_recv() {
                    if dispatch(event).is_break() {
                        break;
                    }
                }
            });
        }
    }
}
