use std::time::Instant;

use tracing::{debug, info};

use super::{Direction, NavRequest, ObserverRegistry};
use crate::config::NavigationConfig;
use crate::scroll::ScrollAnimator;
use crate::section::{Section, SectionRegistry};

/// Where the state machine is
#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Transitioning {
        target: usize,
        started: Instant,
    },
}

/// Snapshot of the navigator for hosts and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
    pub current_index: usize,
    pub is_transitioning: bool,
    /// Index the running transition will land on
    pub target_index: Option<usize>,
    /// Latest request received mid-transition
    pub pending: Option<NavRequest>,
}

impl NavigationState {
    /// Pending request as a signed unit value, when it is relative
    pub fn pending_direction(&self) -> Option<i8> {
        self.pending
            .and_then(NavRequest::direction)
            .map(Direction::signum)
    }
}

/// Result of handing a request to the navigator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A transition towards `to` began
    Started { from: usize, to: usize },
    /// A transition is running; the request replaced any earlier pending one
    Queued,
    /// Out of range, already there, or nothing to navigate
    Ignored,
}

/// Output of one animation frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    /// Scroll offset to apply, if a transition is running
    pub offset: Option<f64>,
    /// Index arrived at on this frame
    pub arrived: Option<usize>,
    /// A pending request started a follow-up transition on arrival
    pub chained: Option<RequestOutcome>,
}

/// The section navigation state machine
///
/// Idle until a request names a different, in-range section; then
/// transitioning until the snap animation reaches its target. Requests that
/// arrive mid-transition never touch the running animation: the latest one
/// is remembered and evaluated on arrival.
#[derive(Debug, Clone)]
pub struct Navigator {
    animator: ScrollAnimator,
    current: usize,
    phase: Phase,
    pending: Option<NavRequest>,
}

impl Navigator {
    pub fn new(config: &NavigationConfig) -> Self {
        Self {
            animator: ScrollAnimator::new(config.transition_duration(), config.easing),
            current: 0,
            phase: Phase::Idle,
            pending: None,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    #[inline]
    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, Phase::Transitioning { .. })
    }

    pub fn state(&self) -> NavigationState {
        NavigationState {
            current_index: self.current,
            is_transitioning: self.is_transitioning(),
            target_index: match self.phase {
                Phase::Transitioning { target, .. } => Some(target),
                Phase::Idle => None,
            },
            pending: self.pending,
        }
    }

    /// When the running transition began
    pub fn transition_started(&self) -> Option<Instant> {
        match self.phase {
            Phase::Transitioning { started, .. } => Some(started),
            Phase::Idle => None,
        }
    }

    /// Submit a request
    ///
    /// `scroll_offset` is where the page currently is; a started transition
    /// animates from there to the target section's top.
    pub fn request(
        &mut self,
        request: NavRequest,
        now: Instant,
        scroll_offset: f64,
        sections: &SectionRegistry,
    ) -> RequestOutcome {
        if sections.is_empty() {
            return RequestOutcome::Ignored;
        }

        if self.is_transitioning() {
            debug!("Transition running, {:?} pending", request);
            self.pending = Some(request);
            return RequestOutcome::Queued;
        }

        let Some(target) = request.resolve(self.current, sections.len()) else {
            debug!("{:?} from section {} is out of range", request, self.current);
            return RequestOutcome::Ignored;
        };
        if target == self.current {
            return RequestOutcome::Ignored;
        }
        let Some(section) = sections.get(target) else {
            return RequestOutcome::Ignored;
        };

        debug!(
            "Transition {} -> {} ({} -> {})",
            self.current, target, scroll_offset, section.offset_top
        );
        self.animator.start(scroll_offset, section.offset_top, now);
        self.phase = Phase::Transitioning {
            target,
            started: now,
        };

        RequestOutcome::Started {
            from: self.current,
            to: target,
        }
    }

    pub fn advance(&mut self, now: Instant, scroll_offset: f64, sections: &SectionRegistry) -> RequestOutcome {
        self.request(NavRequest::Advance, now, scroll_offset, sections)
    }

    pub fn retreat(&mut self, now: Instant, scroll_offset: f64, sections: &SectionRegistry) -> RequestOutcome {
        self.request(NavRequest::Retreat, now, scroll_offset, sections)
    }

    pub fn first(&mut self, now: Instant, scroll_offset: f64, sections: &SectionRegistry) -> RequestOutcome {
        self.request(NavRequest::First, now, scroll_offset, sections)
    }

    pub fn last(&mut self, now: Instant, scroll_offset: f64, sections: &SectionRegistry) -> RequestOutcome {
        self.request(NavRequest::Last, now, scroll_offset, sections)
    }

    pub fn go_to(
        &mut self,
        index: usize,
        now: Instant,
        scroll_offset: f64,
        sections: &SectionRegistry,
    ) -> RequestOutcome {
        self.request(NavRequest::Goto(index), now, scroll_offset, sections)
    }

    /// Jump to a section by id; unknown ids are ignored
    pub fn go_to_id(
        &mut self,
        id: &str,
        now: Instant,
        scroll_offset: f64,
        sections: &SectionRegistry,
    ) -> RequestOutcome {
        match sections.find(id) {
            Some(index) => self.go_to(index, now, scroll_offset, sections),
            None => RequestOutcome::Ignored,
        }
    }

    /// Advance the animation to `now`
    ///
    /// On the arrival frame the current index moves to the target, observers
    /// are notified, and any pending request is evaluated from the arrival
    /// offset.
    pub fn tick(
        &mut self,
        now: Instant,
        sections: &SectionRegistry,
        observers: &mut ObserverRegistry,
    ) -> Frame {
        let Phase::Transitioning { target, .. } = self.phase else {
            return Frame::default();
        };
        let Some(sample) = self.animator.sample(now) else {
            return Frame::default();
        };

        let mut frame = Frame {
            offset: Some(sample.offset),
            ..Frame::default()
        };
        if !sample.finished {
            return frame;
        }

        self.phase = Phase::Idle;
        let previous = self.current;
        self.current = target;
        frame.arrived = Some(target);
        self.notify(previous, sections, observers);

        if let Some(request) = self.pending.take() {
            let outcome = self.request(request, now, sample.offset, sections);
            debug!("Pending {:?} on arrival: {:?}", request, outcome);
            frame.chained = Some(outcome);
        }

        frame
    }

    /// Set the active section without animating
    ///
    /// Used to follow free scrolling while the lock is off. Ignored during
    /// a transition, for out-of-range indices, and when nothing changes.
    pub fn sync_to(
        &mut self,
        index: usize,
        sections: &SectionRegistry,
        observers: &mut ObserverRegistry,
    ) -> bool {
        if self.is_transitioning() || index >= sections.len() || index == self.current {
            return false;
        }
        let previous = self.current;
        self.current = index;
        self.notify(previous, sections, observers);
        true
    }

    /// Bring indices back in range after the registry was rebuilt
    ///
    /// A running transition is re-aimed at its target's new offset,
    /// continuing from `scroll_offset`. When the machine is idle and the
    /// current section fell off the end, observers hear about the move
    /// from `replaced` (the active section before the rebuild).
    pub fn reconcile(
        &mut self,
        now: Instant,
        scroll_offset: f64,
        sections: &SectionRegistry,
        replaced: Option<&Section>,
        observers: &mut ObserverRegistry,
    ) {
        let last = sections.len().saturating_sub(1);
        let clamped = self.current.min(last);
        let moved = clamped != self.current;
        self.current = clamped;

        if moved && !self.is_transitioning() {
            if let (Some(new), Some(prev)) = (sections.get(self.current), replaced) {
                info!("Active section: {} ({} -> {}) after rescan", new.id, prev.index, new.index);
                observers.notify(new, prev);
            }
        }

        if let Phase::Transitioning { target, .. } = self.phase {
            match sections.get(target.min(last)) {
                Some(section) => {
                    self.animator.start(scroll_offset, section.offset_top, now);
                    self.phase = Phase::Transitioning {
                        target: section.index,
                        started: now,
                    };
                }
                None => {
                    self.phase = Phase::Idle;
                    self.pending = None;
                }
            }
        }
    }

    fn notify(&self, previous: usize, sections: &SectionRegistry, observers: &mut ObserverRegistry) {
        let (Some(new), Some(prev)) = (sections.get(self.current), sections.get(previous)) else {
            return;
        };
        info!("Active section: {} ({} -> {})", new.id, prev.index, new.index);
        observers.notify(new, prev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::stacked;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    const DURATION: Duration = Duration::from_millis(1200);

    fn five_sections() -> SectionRegistry {
        SectionRegistry::from_source(&stacked(&["hero", "about", "gallery", "works", "contact"], 800.0))
    }

    fn navigator() -> Navigator {
        Navigator::new(&NavigationConfig::default())
    }

    /// Tick at 16ms intervals until idle, returning every arrival
    fn run_to_rest(
        nav: &mut Navigator,
        now: &mut Instant,
        sections: &SectionRegistry,
        observers: &mut ObserverRegistry,
    ) -> Vec<usize> {
        let mut arrivals = Vec::new();
        for _ in 0..10_000 {
            if !nav.is_transitioning() {
                break;
            }
            *now += Duration::from_millis(16);
            if let Some(index) = nav.tick(*now, sections, observers).arrived {
                arrivals.push(index);
            }
        }
        arrivals
    }

    #[test]
    fn test_single_advance_arrives() {
        let sections = five_sections();
        let mut observers = ObserverRegistry::new();
        let mut nav = navigator();
        let mut now = Instant::now();

        assert_eq!(
            nav.advance(now, 0.0, &sections),
            RequestOutcome::Started { from: 0, to: 1 }
        );
        let state = nav.state();
        assert!(state.is_transitioning);
        assert_eq!(state.target_index, Some(1));
        assert_eq!(state.current_index, 0);

        assert_eq!(run_to_rest(&mut nav, &mut now, &sections, &mut observers), [1]);
        let state = nav.state();
        assert!(!state.is_transitioning);
        assert_eq!(state.current_index, 1);
    }

    #[test]
    fn test_rapid_requests_chain_once() {
        let sections = five_sections();
        let mut observers = ObserverRegistry::new();
        let mut nav = navigator();
        let mut now = Instant::now();

        nav.advance(now, 0.0, &sections);
        for _ in 0..3 {
            now += Duration::from_millis(50);
            assert_eq!(nav.advance(now, 0.0, &sections), RequestOutcome::Queued);
        }
        assert_eq!(nav.state().pending_direction(), Some(1));

        let arrivals = run_to_rest(&mut nav, &mut now, &sections, &mut observers);
        assert_eq!(arrivals, [1, 2]);
        assert_eq!(nav.current_index(), 2);
        assert_eq!(nav.state().pending, None);
    }

    #[test]
    fn test_latest_pending_wins() {
        let sections = five_sections();
        let mut observers = ObserverRegistry::new();
        let mut nav = navigator();
        let mut now = Instant::now();

        nav.advance(now, 0.0, &sections);
        nav.advance(now, 0.0, &sections);
        nav.request(NavRequest::Last, now, 0.0, &sections);
        nav.retreat(now, 0.0, &sections);
        assert_eq!(nav.state().pending, Some(NavRequest::Retreat));

        assert_eq!(run_to_rest(&mut nav, &mut now, &sections, &mut observers), [1, 0]);
    }

    #[test]
    fn test_queued_request_does_not_alter_animation() {
        let sections = five_sections();
        let mut observers = ObserverRegistry::new();
        let mut nav = navigator();
        let start = Instant::now();

        nav.advance(start, 0.0, &sections);
        nav.request(NavRequest::Last, start + Duration::from_millis(100), 0.0, &sections);
        assert_eq!(nav.transition_started(), Some(start));

        let frame = nav.tick(start + DURATION / 2, &sections, &mut observers);
        assert!((frame.offset.unwrap() - 400.0).abs() < 0.001);
        assert_eq!(nav.state().target_index, Some(1));
    }

    #[test]
    fn test_edges_are_idempotent() {
        let sections = five_sections();
        let mut observers = ObserverRegistry::new();
        let mut nav = navigator();
        let mut now = Instant::now();

        assert_eq!(nav.retreat(now, 0.0, &sections), RequestOutcome::Ignored);
        assert_eq!(nav.current_index(), 0);
        assert!(!nav.is_transitioning());

        nav.request(NavRequest::Last, now, 0.0, &sections);
        run_to_rest(&mut nav, &mut now, &sections, &mut observers);
        assert_eq!(nav.current_index(), 4);

        assert_eq!(nav.advance(now, 3200.0, &sections), RequestOutcome::Ignored);
        assert_eq!(nav.current_index(), 4);
        assert!(!nav.is_transitioning());
        assert_eq!(
            nav.request(NavRequest::Last, now, 3200.0, &sections),
            RequestOutcome::Ignored
        );
    }

    #[test]
    fn test_bounds_hold_for_mixed_sequences() {
        let sections = five_sections();
        let mut observers = ObserverRegistry::new();
        let mut nav = navigator();
        let mut now = Instant::now();

        // deterministic pseudo-random walk
        let mut seed: u32 = 0x2545_f491;
        for _ in 0..200 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let offset = sections.get(nav.current_index()).unwrap().offset_top;
            if seed % 2 == 0 {
                nav.advance(now, offset, &sections);
            } else {
                nav.retreat(now, offset, &sections);
            }
            if seed % 3 == 0 {
                run_to_rest(&mut nav, &mut now, &sections, &mut observers);
            } else {
                now += Duration::from_millis(300);
                nav.tick(now, &sections, &mut observers);
            }
            assert!(nav.current_index() < sections.len());
            if let Some(target) = nav.state().target_index {
                assert!(target < sections.len());
            }
        }
    }

    #[test]
    fn test_completion_converges_on_requested_target() {
        let sections = five_sections();
        let mut observers = ObserverRegistry::new();
        let mut nav = navigator();
        let start = Instant::now();

        nav.request(NavRequest::Goto(3), start, 0.0, &sections);
        let early = nav.tick(start + Duration::from_millis(600), &sections, &mut observers);
        assert_eq!(early.arrived, None);
        assert!(nav.is_transitioning());

        let done = nav.tick(start + DURATION, &sections, &mut observers);
        assert_eq!(done.arrived, Some(3));
        assert_eq!(done.offset, Some(2400.0));
        assert!(!nav.is_transitioning());
        assert_eq!(nav.current_index(), 3);
    }

    #[test]
    fn test_empty_registry_is_inert() {
        let sections = SectionRegistry::new();
        let mut observers = ObserverRegistry::new();
        let mut nav = navigator();
        let now = Instant::now();

        for request in [
            NavRequest::Advance,
            NavRequest::Retreat,
            NavRequest::First,
            NavRequest::Last,
            NavRequest::Goto(0),
        ] {
            assert_eq!(nav.request(request, now, 0.0, &sections), RequestOutcome::Ignored);
        }
        assert_eq!(nav.tick(now, &sections, &mut observers), Frame::default());
        assert!(!nav.sync_to(0, &sections, &mut observers));
        nav.reconcile(now, 0.0, &sections, None, &mut observers);
        assert_eq!(nav.state().current_index, 0);
        assert!(!nav.is_transitioning());
    }

    #[test]
    fn test_observers_see_destinations_only() {
        let sections = five_sections();
        let mut observers = ObserverRegistry::new();
        let seen: Rc<RefCell<Vec<(String, String)>>> = Rc::default();
        let log = seen.clone();
        observers.subscribe(Box::new(move |new: &Section, prev: &Section| {
            log.borrow_mut().push((prev.id.clone(), new.id.clone()));
        }));

        let mut nav = navigator();
        let mut now = Instant::now();
        nav.go_to_id("works", now, 0.0, &sections);
        for _ in 0..10 {
            now += Duration::from_millis(100);
            nav.tick(now, &sections, &mut observers);
        }
        assert!(seen.borrow().is_empty());

        run_to_rest(&mut nav, &mut now, &sections, &mut observers);
        assert_eq!(*seen.borrow(), [("hero".to_string(), "works".to_string())]);
    }

    #[test]
    fn test_first_last_and_go_to() {
        let sections = five_sections();
        let mut observers = ObserverRegistry::new();
        let mut nav = navigator();
        let mut now = Instant::now();

        assert_eq!(nav.first(now, 0.0, &sections), RequestOutcome::Ignored);
        assert_eq!(
            nav.last(now, 0.0, &sections),
            RequestOutcome::Started { from: 0, to: 4 }
        );
        assert_eq!(run_to_rest(&mut nav, &mut now, &sections, &mut observers), [4]);

        assert_eq!(nav.go_to(9, now, 3200.0, &sections), RequestOutcome::Ignored);
        assert_eq!(
            nav.go_to(2, now, 3200.0, &sections),
            RequestOutcome::Started { from: 4, to: 2 }
        );
        assert_eq!(run_to_rest(&mut nav, &mut now, &sections, &mut observers), [2]);
    }

    #[test]
    fn test_go_to_unknown_id_is_ignored() {
        let sections = five_sections();
        let mut nav = navigator();
        assert_eq!(
            nav.go_to_id("missing", Instant::now(), 0.0, &sections),
            RequestOutcome::Ignored
        );
    }

    #[test]
    fn test_sync_to_notifies_and_respects_transition() {
        let sections = five_sections();
        let mut observers = ObserverRegistry::new();
        let hits = Rc::new(RefCell::new(0));
        let counter = hits.clone();
        observers.subscribe(Box::new(move |_: &Section, _: &Section| {
            *counter.borrow_mut() += 1;
        }));

        let mut nav = navigator();
        assert!(nav.sync_to(2, &sections, &mut observers));
        assert!(!nav.sync_to(2, &sections, &mut observers));
        assert!(!nav.sync_to(9, &sections, &mut observers));
        assert_eq!(nav.current_index(), 2);

        nav.advance(Instant::now(), 1600.0, &sections);
        assert!(!nav.sync_to(0, &sections, &mut observers));
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_instant_preset_lands_on_next_tick() {
        let sections = five_sections();
        let mut observers = ObserverRegistry::new();
        let config = NavigationConfig {
            transition_duration_ms: 0,
            ..Default::default()
        };
        let mut nav = Navigator::new(&config);
        let now = Instant::now();

        nav.advance(now, 0.0, &sections);
        let frame = nav.tick(now, &sections, &mut observers);
        assert_eq!(frame.arrived, Some(1));
        assert_eq!(frame.offset, Some(800.0));
    }

    #[test]
    fn test_reconcile_after_shrink() {
        let mut sections = five_sections();
        let mut observers = ObserverRegistry::new();
        let mut nav = navigator();
        let mut now = Instant::now();

        nav.request(NavRequest::Last, now, 0.0, &sections);
        let sections_before = sections.get(0).cloned();
        sections.refresh(&stacked(&["hero", "about"], 600.0));
        nav.reconcile(now, 100.0, &sections, sections_before.as_ref(), &mut observers);
        assert_eq!(nav.state().target_index, Some(1));

        let arrivals = run_to_rest(&mut nav, &mut now, &sections, &mut observers);
        assert_eq!(arrivals, [1]);
        assert_eq!(nav.current_index(), 1);
    }

    #[test]
    fn test_idle_shrink_announces_the_clamped_section() {
        let mut sections = five_sections();
        let mut observers = ObserverRegistry::new();
        let seen: Rc<RefCell<Vec<(String, String)>>> = Rc::default();
        let log = seen.clone();
        observers.subscribe(Box::new(move |new: &Section, previous: &Section| {
            log.borrow_mut().push((previous.id.clone(), new.id.clone()));
        }));
        let mut nav = navigator();
        let mut now = Instant::now();

        nav.request(NavRequest::Last, now, 0.0, &sections);
        run_to_rest(&mut nav, &mut now, &sections, &mut observers);
        assert_eq!(nav.current_index(), 4);
        seen.borrow_mut().clear();

        let before = sections.get(nav.current_index()).cloned();
        sections.refresh(&stacked(&["hero", "about"], 800.0));
        nav.reconcile(now, 3200.0, &sections, before.as_ref(), &mut observers);

        assert_eq!(nav.current_index(), 1);
        assert!(!nav.is_transitioning());
        assert_eq!(*seen.borrow(), [("contact".to_string(), "about".to_string())]);

        // a rescan that keeps the index in range stays quiet
        let before = sections.get(nav.current_index()).cloned();
        sections.refresh(&stacked(&["hero", "about", "works"], 600.0));
        nav.reconcile(now, 800.0, &sections, before.as_ref(), &mut observers);
        assert_eq!(seen.borrow().len(), 1);
    }
}
