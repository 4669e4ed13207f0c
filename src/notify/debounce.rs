//! Leading-edge debouncing of bursty events.

use std::time::{Duration, Instant};

/// Collapses bursts of events into one, firing on the first event of a burst.
///
/// A burst ends once no event has arrived for a full window. Every event,
/// fired or absorbed, restarts the window.
///
/// # Examples
///
/// ```rust
/// use settings_store::notify::Debouncer;
/// use std::time::{Duration, Instant};
///
/// let mut debouncer = Debouncer::new(Duration::from_millis(100));
/// let start = Instant::now();
///
/// assert!(debouncer.should_fire(start));
/// assert!(!debouncer.should_fire(start + Duration::from_millis(30)));
/// assert!(debouncer.should_fire(start + Duration::from_millis(200)));
/// ```
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    last_event: Option<Instant>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_event: None,
        }
    }

    /// Record an event at `now` and report whether it should be handled.
    pub fn should_fire(&mut self, now: Instant) -> bool {
        let fire = self
            .last_event
            .is_none_or(|last| now.saturating_duration_since(last) >= self.window);
        self.last_event = Some(now);
        fire
    }

    /// The quiet window.
    pub fn window(&self) -> Duration {
        self.window
    }
}
