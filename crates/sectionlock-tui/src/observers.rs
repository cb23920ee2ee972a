//! Presentational observers. Each one subscribes to section changes and
//! updates its slice of the shared `Presentation` the widgets draw from.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use sectionlock_core::{PageSection, Section, SectionLock, SectionObserver, SubscriptionId, Tone};
use tracing::debug;

/// Delay between successive body lines appearing
pub const ENTRANCE_STAGGER: Duration = Duration::from_millis(100);

/// Camera depth step between sections
const CAMERA_DEPTH_STEP: f64 = -20.0;

/// Body reveal for a freshly entered section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entrance {
    pub index: usize,
    pub started: Instant,
}

impl Entrance {
    /// Number of body lines revealed at `now`
    pub fn visible_lines(&self, now: Instant, total: usize) -> usize {
        let elapsed = now.saturating_duration_since(self.started);
        let shown = (elapsed.as_millis() / ENTRANCE_STAGGER.as_millis().max(1)) as usize + 1;
        shown.min(total)
    }

    pub fn is_complete(&self, now: Instant, total: usize) -> bool {
        self.visible_lines(now, total) >= total
    }
}

/// Everything the observers decide about how the page looks
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    /// Section highlighted in the navigation bar
    pub active_id: Option<String>,
    pub tone: Tone,
    pub entrance: Option<Entrance>,
    pub camera_depth: f64,
    /// Host time of the frame or event being processed. Observers stamp
    /// what they start with it.
    pub clock: Option<Instant>,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            active_id: None,
            tone: Tone::Dark,
            entrance: None,
            camera_depth: 0.0,
            clock: None,
        }
    }
}

impl Presentation {
    /// Initial state for a page resting on `section`
    pub fn resting_on(section: Option<&PageSection>) -> Self {
        Self {
            active_id: section.map(|s| s.id.clone()),
            tone: section.map(|s| s.tone).unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn set_clock(&mut self, now: Instant) {
        self.clock = Some(now);
    }

    /// Body lines of a section shown at `now`. Sections that were never
    /// entered (including the first one) show everything.
    pub fn visible_lines(&self, index: usize, now: Instant, total: usize) -> usize {
        match self.entrance {
            Some(entrance) if entrance.index == index => entrance.visible_lines(now, total),
            _ => total,
        }
    }

    pub fn is_revealing(&self, now: Instant, lines_of: impl Fn(usize) -> usize) -> bool {
        self.entrance
            .is_some_and(|e| !e.is_complete(now, lines_of(e.index)))
    }
}

pub type SharedPresentation = Rc<RefCell<Presentation>>;

/// Marks the active link in the navigation bar
pub struct NavHighlight {
    presentation: SharedPresentation,
}

impl SectionObserver for NavHighlight {
    fn on_section_changed(&mut self, new: &Section, _previous: &Section) {
        self.presentation.borrow_mut().active_id = Some(new.id.clone());
    }
}

/// Switches the page palette to the tone the new section asks for
pub struct BackgroundSwitch {
    presentation: SharedPresentation,
    tones: HashMap<String, Tone>,
}

impl SectionObserver for BackgroundSwitch {
    fn on_section_changed(&mut self, new: &Section, _previous: &Section) {
        let tone = self.tones.get(&new.id).copied().unwrap_or_default();
        let mut presentation = self.presentation.borrow_mut();
        if presentation.tone != tone {
            debug!("Background tone {:?} -> {:?}", presentation.tone, tone);
        }
        presentation.tone = tone;
    }
}

/// Starts the staggered body reveal of the section just entered
pub struct SectionEntrance {
    presentation: SharedPresentation,
}

impl SectionObserver for SectionEntrance {
    fn on_section_changed(&mut self, new: &Section, _previous: &Section) {
        let mut presentation = self.presentation.borrow_mut();
        // without a host clock there is nothing to time the reveal against
        presentation.entrance = presentation.clock.map(|started| Entrance {
            index: new.index,
            started,
        });
    }
}

/// Moves the camera to the depth assigned to the new section
pub struct CameraFraming {
    presentation: SharedPresentation,
}

impl SectionObserver for CameraFraming {
    fn on_section_changed(&mut self, new: &Section, _previous: &Section) {
        self.presentation.borrow_mut().camera_depth = new.index as f64 * CAMERA_DEPTH_STEP;
    }
}

/// Subscribe all presentational observers to `lock`
pub fn subscribe_all(
    lock: &mut SectionLock,
    presentation: &SharedPresentation,
    sections: &[PageSection],
) -> Vec<SubscriptionId> {
    let tones = sections.iter().map(|s| (s.id.clone(), s.tone)).collect();
    vec![
        lock.subscribe(Box::new(NavHighlight {
            presentation: presentation.clone(),
        })),
        lock.subscribe(Box::new(BackgroundSwitch {
            presentation: presentation.clone(),
            tones,
        })),
        lock.subscribe(Box::new(SectionEntrance {
            presentation: presentation.clone(),
        })),
        lock.subscribe(Box::new(CameraFraming {
            presentation: presentation.clone(),
        })),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use sectionlock_core::config::AppConfig;
    use sectionlock_core::section::stacked;
    use sectionlock_core::NavRequest;

    fn page_sections() -> Vec<PageSection> {
        AppConfig::default().ui.sections
    }

    fn settle(lock: &mut SectionLock, presentation: &SharedPresentation, now: &mut Instant) {
        while lock.state().is_transitioning {
            *now += Duration::from_millis(16);
            presentation.borrow_mut().set_clock(*now);
            lock.tick(*now);
        }
    }

    #[test]
    fn test_entrance_reveals_one_line_per_stagger() {
        let start = Instant::now();
        let entrance = Entrance { index: 1, started: start };

        assert_eq!(entrance.visible_lines(start, 4), 1);
        assert_eq!(entrance.visible_lines(start + Duration::from_millis(99), 4), 1);
        assert_eq!(entrance.visible_lines(start + Duration::from_millis(100), 4), 2);
        assert_eq!(entrance.visible_lines(start + Duration::from_secs(5), 4), 4);
        assert!(entrance.is_complete(start + Duration::from_millis(300), 4));
        assert_eq!(entrance.visible_lines(start, 0), 0);
    }

    #[test]
    fn test_presentation_only_hides_the_entering_section() {
        let start = Instant::now();
        let presentation = Presentation {
            entrance: Some(Entrance { index: 2, started: start }),
            ..Presentation::default()
        };
        assert_eq!(presentation.visible_lines(2, start, 5), 1);
        assert_eq!(presentation.visible_lines(1, start, 5), 5);
        assert!(presentation.is_revealing(start, |_| 5));
        assert!(!Presentation::default().is_revealing(start, |_| 5));
    }

    #[test]
    fn test_observers_follow_arrivals() {
        let sections = page_sections();
        let ids: Vec<&str> = sections.iter().map(|s| s.id.as_str()).collect();
        let mut lock = SectionLock::with_source(AppConfig::default(), &stacked(&ids, 800.0));
        let presentation = Rc::new(RefCell::new(Presentation::resting_on(sections.first())));
        let subscriptions = subscribe_all(&mut lock, &presentation, &sections);
        assert_eq!(subscriptions.len(), 4);

        let mut now = Instant::now();
        lock.request(NavRequest::Advance, now);
        // nothing changes until arrival
        lock.tick(now + Duration::from_millis(600));
        assert_eq!(presentation.borrow().active_id.as_deref(), Some("hero"));

        settle(&mut lock, &presentation, &mut now);
        {
            let p = presentation.borrow();
            assert_eq!(p.active_id.as_deref(), Some("about"));
            assert_eq!(p.tone, Tone::Bright);
            assert_eq!(
                p.entrance,
                Some(Entrance { index: 1, started: now })
            );
            assert_eq!(p.camera_depth, -20.0);
        }

        lock.request(NavRequest::Goto(2), now);
        settle(&mut lock, &presentation, &mut now);
        let p = presentation.borrow();
        assert_eq!(p.active_id.as_deref(), Some("parallax-gallery"));
        assert_eq!(p.tone, Tone::Dark);
        assert_eq!(p.camera_depth, -40.0);
    }

    #[test]
    fn test_entrance_uses_host_clock() {
        let sections = page_sections();
        let ids: Vec<&str> = sections.iter().map(|s| s.id.as_str()).collect();
        let mut lock = SectionLock::with_source(AppConfig::default(), &stacked(&ids, 800.0));
        let presentation = Rc::new(RefCell::new(Presentation::resting_on(sections.first())));
        subscribe_all(&mut lock, &presentation, &sections);

        // a recorded timeline far from the wall clock
        let start = Instant::now() + Duration::from_secs(3600);
        lock.request(NavRequest::Goto(3), start);
        let arrival = start + Duration::from_millis(1500);
        presentation.borrow_mut().set_clock(arrival);
        assert_eq!(lock.tick(arrival).arrived, Some(3));

        let p = presentation.borrow();
        assert_eq!(p.entrance, Some(Entrance { index: 3, started: arrival }));
        assert_eq!(p.visible_lines(3, arrival + Duration::from_millis(100), 4), 2);
    }

    #[test]
    fn test_unsubscribed_observers_stop_updating() {
        let sections = page_sections();
        let ids: Vec<&str> = sections.iter().map(|s| s.id.as_str()).collect();
        let mut lock = SectionLock::with_source(AppConfig::default(), &stacked(&ids, 800.0));
        let presentation = Rc::new(RefCell::new(Presentation::resting_on(sections.first())));
        for id in subscribe_all(&mut lock, &presentation, &sections) {
            assert!(lock.unsubscribe(id));
        }

        let mut now = Instant::now();
        lock.request(NavRequest::Last, now);
        settle(&mut lock, &presentation, &mut now);
        assert_eq!(presentation.borrow().active_id.as_deref(), Some("hero"));
        assert_eq!(presentation.borrow().camera_depth, 0.0);
    }
}
