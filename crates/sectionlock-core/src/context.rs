//! The application context: one object owning every piece of the
//! controller, constructed at startup and passed to whoever needs it.

use std::time::Instant;

use tracing::{debug, info};

use crate::config::AppConfig;
use crate::input::{InputAggregator, InputEvent, InputOutcome};
use crate::nav::{
    Frame, NavRequest, NavigationState, Navigator, ObserverRegistry, RequestOutcome,
    SectionObserver, SubscriptionId,
};
use crate::section::{ResizeDebouncer, Section, SectionRegistry, SectionSource};

/// What happened to one input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handled {
    pub input: InputOutcome,
    /// Navigator's answer, when the event produced a request
    pub navigation: Option<RequestOutcome>,
}

/// Scroll-lock navigation controller
#[derive(Debug)]
pub struct SectionLock {
    config: AppConfig,
    sections: SectionRegistry,
    input: InputAggregator,
    navigator: Navigator,
    observers: ObserverRegistry,
    resize: ResizeDebouncer,
    scroll_offset: f64,
    /// Viewport height last reported by free scrolling
    viewport_height: f64,
}

impl SectionLock {
    pub fn new(config: AppConfig) -> Self {
        Self {
            sections: SectionRegistry::new(),
            input: InputAggregator::new(config.wheel.clone(), config.touch.clone()),
            navigator: Navigator::new(&config.navigation),
            observers: ObserverRegistry::new(),
            resize: ResizeDebouncer::new(config.resize.debounce()),
            scroll_offset: 0.0,
            viewport_height: 0.0,
            config,
        }
    }

    /// Create and scan the layout in one step
    pub fn with_source(config: AppConfig, source: &(impl SectionSource + ?Sized)) -> Self {
        let mut lock = Self::new(config);
        lock.refresh(source, Instant::now());
        lock
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn sections(&self) -> &SectionRegistry {
        &self.sections
    }

    pub fn state(&self) -> NavigationState {
        self.navigator.state()
    }

    pub fn current_section(&self) -> Option<&Section> {
        self.sections.get(self.navigator.current_index())
    }

    /// Current page scroll offset
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn is_lock_enabled(&self) -> bool {
        self.input.is_enabled()
    }

    /// Whether the host must keep delivering frames
    pub fn needs_frames(&self) -> bool {
        self.navigator.is_transitioning() || self.resize.is_pending()
    }

    pub fn subscribe(&mut self, observer: Box<dyn SectionObserver>) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Rescan the layout now
    ///
    /// While locked the page stays pinned to the active section's new top.
    /// While unlocked the free scroll position is kept, clamped to the new
    /// page height, and the active section follows it.
    pub fn refresh(&mut self, source: &(impl SectionSource + ?Sized), now: Instant) {
        let replaced = self.current_section().cloned();
        self.sections.refresh(source);
        self.navigator.reconcile(
            now,
            self.scroll_offset,
            &self.sections,
            replaced.as_ref(),
            &mut self.observers,
        );
        if self.navigator.is_transitioning() {
            return;
        }

        if self.input.is_enabled() {
            if let Some(section) = self.current_section() {
                self.scroll_offset = section.offset_top;
            }
        } else {
            self.follow_scroll(self.scroll_offset);
        }
    }

    /// Record a viewport resize; the rescan happens in `poll_resize`
    pub fn note_resize(&mut self, now: Instant) {
        self.resize.note(now);
    }

    /// Rescan once the resize burst has settled. Returns true if it did.
    pub fn poll_resize(&mut self, source: &(impl SectionSource + ?Sized), now: Instant) -> bool {
        if self.resize.poll(now) {
            debug!("Resize settled, rescanning sections");
            self.refresh(source, now);
            true
        } else {
            false
        }
    }

    /// Feed a host input event through the aggregator to the navigator
    pub fn handle_input(&mut self, event: InputEvent, now: Instant) -> Handled {
        let input = self
            .input
            .handle(event, self.navigator.is_transitioning());
        let navigation = input.request.map(|request| self.request(request, now));
        Handled { input, navigation }
    }

    pub fn request(&mut self, request: NavRequest, now: Instant) -> RequestOutcome {
        self.navigator
            .request(request, now, self.scroll_offset, &self.sections)
    }

    pub fn go_to_id(&mut self, id: &str, now: Instant) -> RequestOutcome {
        self.navigator
            .go_to_id(id, now, self.scroll_offset, &self.sections)
    }

    /// Render-loop callback: advance the animation and apply its offset
    pub fn tick(&mut self, now: Instant) -> Frame {
        let frame = self.navigator.tick(now, &self.sections, &mut self.observers);
        if let Some(offset) = frame.offset {
            self.scroll_offset = offset;
        }
        frame
    }

    /// Enable or disable the scroll lock (e.g. while a menu covers the page)
    pub fn set_lock_enabled(&mut self, enabled: bool) {
        if self.input.is_enabled() != enabled {
            info!("Scroll lock {}", if enabled { "enabled" } else { "disabled" });
        }
        self.input.set_enabled(enabled);
    }

    /// Native scrolling while unlocked; the active section follows the
    /// viewport centre. Ignored while the lock is on or a transition runs.
    pub fn scroll_freely(&mut self, offset: f64, viewport_height: f64) -> bool {
        if self.input.is_enabled() || self.navigator.is_transitioning() {
            return false;
        }
        self.viewport_height = viewport_height.max(0.0);
        self.follow_scroll(offset)
    }

    /// Clamp `offset` to the page and sync the active section to it
    fn follow_scroll(&mut self, offset: f64) -> bool {
        let max = self
            .sections
            .last()
            .map(|s| (s.bottom() - self.viewport_height).max(0.0))
            .unwrap_or(0.0);
        self.scroll_offset = offset.clamp(0.0, max);

        match self.sections.index_at(self.scroll_offset, self.viewport_height) {
            Some(index) => self
                .navigator
                .sync_to(index, &self.sections, &mut self.observers),
            None => false,
        }
    }
}
