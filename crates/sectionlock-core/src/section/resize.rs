use std::time::{Duration, Instant};

/// Collapses a burst of resize notifications into one refresh
///
/// `note()` records each resize; `poll()` answers true exactly once, when
/// the quiet period has elapsed since the last recorded resize.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    quiet: Duration,
    last_resize: Option<Instant>,
}

impl ResizeDebouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            last_resize: None,
        }
    }

    pub fn note(&mut self, now: Instant) {
        self.last_resize = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.last_resize.is_some()
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        match self.last_resize {
            Some(last) if now.saturating_duration_since(last) >= self.quiet => {
                self.last_resize = None;
                true
            }
            _ => false,
        }
    }
}
