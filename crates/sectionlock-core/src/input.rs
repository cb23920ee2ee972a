//! Input aggregation: raw wheel, touch and key events in, at most one
//! navigation request per physical gesture out.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::{TouchConfig, WheelConfig};
use crate::nav::NavRequest;

/// Navigation keys understood by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavKey {
    Down,
    Up,
    PageDown,
    PageUp,
    Home,
    End,
}

impl NavKey {
    pub fn request(self) -> NavRequest {
        match self {
            NavKey::Down | NavKey::PageDown => NavRequest::Advance,
            NavKey::Up | NavKey::PageUp => NavRequest::Retreat,
            NavKey::Home => NavRequest::First,
            NavKey::End => NavRequest::Last,
        }
    }
}

/// Host input, already stripped of host-specific detail
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Wheel movement; positive `delta_y` scrolls down
    Wheel { delta_y: f64, at: Instant },
    TouchStart { y: f64, at: Instant },
    TouchEnd { y: f64, at: Instant },
    Key(NavKey),
}

/// What the host should do with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputOutcome {
    pub request: Option<NavRequest>,
    /// Suppress the host's own scrolling for this event
    pub prevent_default: bool,
}

impl InputOutcome {
    fn pass() -> Self {
        Self::default()
    }

    fn captured(request: Option<NavRequest>) -> Self {
        Self {
            request,
            prevent_default: true,
        }
    }
}

/// Running wheel gesture
#[derive(Debug, Clone, Default)]
struct WheelGesture {
    accumulated: f64,
    last_event: Option<Instant>,
}

/// Normalizes wheel, touch and keyboard input into navigation requests
#[derive(Debug, Clone)]
pub struct InputAggregator {
    wheel: WheelConfig,
    touch: TouchConfig,
    enabled: bool,
    gesture: WheelGesture,
    touch_start: Option<(f64, Instant)>,
}

impl InputAggregator {
    pub fn new(wheel: WheelConfig, touch: TouchConfig) -> Self {
        Self {
            wheel,
            touch,
            enabled: true,
            gesture: WheelGesture::default(),
            touch_start: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn the scroll lock on or off; any partial gesture is dropped
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.gesture = WheelGesture::default();
        self.touch_start = None;
    }

    /// Current wheel accumulator value
    pub fn accumulated(&self) -> f64 {
        self.gesture.accumulated
    }

    /// Feed one event. `transitioning` reports the navigator's state.
    pub fn handle(&mut self, event: InputEvent, transitioning: bool) -> InputOutcome {
        if !self.enabled {
            return InputOutcome::pass();
        }

        match event {
            InputEvent::Wheel { delta_y, at } => self.handle_wheel(delta_y, at, transitioning),
            InputEvent::TouchStart { y, at } => {
                self.touch_start = Some((y, at));
                InputOutcome::pass()
            }
            InputEvent::TouchEnd { y, at } => InputOutcome {
                request: self.handle_touch_end(y, at),
                prevent_default: false,
            },
            InputEvent::Key(key) => InputOutcome::captured(Some(key.request())),
        }
    }

    fn handle_wheel(&mut self, delta_y: f64, at: Instant, transitioning: bool) -> InputOutcome {
        if transitioning {
            // swallow the event so native scrolling cannot fight the animation
            self.gesture = WheelGesture::default();
            return InputOutcome::captured(None);
        }

        let gap_exceeded = self
            .gesture
            .last_event
            .map(|last| at.saturating_duration_since(last) > self.wheel.gesture_gap())
            .unwrap_or(true);
        if gap_exceeded {
            self.gesture.accumulated = 0.0;
        }
        self.gesture.last_event = Some(at);
        self.gesture.accumulated += delta_y;

        let accumulated = self.gesture.accumulated;
        if accumulated.abs() > self.wheel.threshold && delta_y.abs() > self.wheel.min_event_delta {
            self.gesture.accumulated = 0.0;
            let request = if accumulated > 0.0 {
                NavRequest::Advance
            } else {
                NavRequest::Retreat
            };
            trace!("Wheel gesture {} crossed threshold: {:?}", accumulated, request);
            return InputOutcome::captured(Some(request));
        }

        InputOutcome::captured(None)
    }

    fn handle_touch_end(&mut self, y: f64, at: Instant) -> Option<NavRequest> {
        let (start_y, start_at) = self.touch_start.take()?;
        let distance = start_y - y;
        let duration = at.saturating_duration_since(start_at);

        if distance.abs() > self.touch.min_distance && duration < self.touch.max_duration() {
            trace!("Swipe of {} in {:?}", distance, duration);
            Some(if distance > 0.0 {
                NavRequest::Advance
            } else {
                NavRequest::Retreat
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn aggregator() -> InputAggregator {
        InputAggregator::new(WheelConfig::default(), TouchConfig::default())
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_wheel_below_threshold_emits_nothing() {
        let mut input = aggregator();
        let t0 = Instant::now();
        for i in 0..9 {
            let outcome = input.handle(
                InputEvent::Wheel { delta_y: 11.0, at: t0 + ms(i * 20) },
                false,
            );
            assert_eq!(outcome.request, None);
            assert!(outcome.prevent_default);
        }
        assert!((input.accumulated() - 99.0).abs() < 1e-9);
    }

    #[test]
    fn test_wheel_threshold_emits_once_and_resets() {
        let mut input = aggregator();
        let t0 = Instant::now();
        let first = input.handle(InputEvent::Wheel { delta_y: 60.0, at: t0 }, false);
        assert_eq!(first.request, None);
        let second = input.handle(InputEvent::Wheel { delta_y: 60.0, at: t0 + ms(30) }, false);
        assert_eq!(second.request, Some(NavRequest::Advance));
        assert_eq!(input.accumulated(), 0.0);

        let up = input.handle(InputEvent::Wheel { delta_y: -120.0, at: t0 + ms(60) }, false);
        assert_eq!(up.request, Some(NavRequest::Retreat));
    }

    #[test]
    fn test_wheel_gap_resets_accumulator() {
        let mut input = aggregator();
        let t0 = Instant::now();
        input.handle(InputEvent::Wheel { delta_y: 90.0, at: t0 }, false);
        let outcome = input.handle(InputEvent::Wheel { delta_y: 20.0, at: t0 + ms(201) }, false);
        assert_eq!(outcome.request, None);
        assert_eq!(input.accumulated(), 20.0);
    }

    #[test]
    fn test_inertia_tail_does_not_trigger() {
        let mut input = aggregator();
        let t0 = Instant::now();
        input.handle(InputEvent::Wheel { delta_y: 95.0, at: t0 }, false);
        // accumulated passes the threshold, but the event itself is noise
        let outcome = input.handle(InputEvent::Wheel { delta_y: 8.0, at: t0 + ms(16) }, false);
        assert_eq!(outcome.request, None);
    }

    #[test]
    fn test_wheel_captured_while_transitioning() {
        let mut input = aggregator();
        let t0 = Instant::now();
        input.handle(InputEvent::Wheel { delta_y: 90.0, at: t0 }, false);
        let outcome = input.handle(InputEvent::Wheel { delta_y: 500.0, at: t0 + ms(10) }, true);
        assert_eq!(outcome, InputOutcome { request: None, prevent_default: true });
        assert_eq!(input.accumulated(), 0.0);
    }

    #[test]
    fn test_touch_swipes() {
        let mut input = aggregator();
        let t0 = Instant::now();

        input.handle(InputEvent::TouchStart { y: 400.0, at: t0 }, false);
        let short = input.handle(InputEvent::TouchEnd { y: 360.0, at: t0 + ms(250) }, false);
        assert_eq!(short.request, None);

        input.handle(InputEvent::TouchStart { y: 400.0, at: t0 }, false);
        let up = input.handle(InputEvent::TouchEnd { y: 310.0, at: t0 + ms(200) }, false);
        assert_eq!(up.request, Some(NavRequest::Advance));

        input.handle(InputEvent::TouchStart { y: 300.0, at: t0 }, false);
        let down = input.handle(InputEvent::TouchEnd { y: 390.0, at: t0 + ms(200) }, false);
        assert_eq!(down.request, Some(NavRequest::Retreat));

        input.handle(InputEvent::TouchStart { y: 400.0, at: t0 }, false);
        let slow = input.handle(InputEvent::TouchEnd { y: 200.0, at: t0 + ms(300) }, false);
        assert_eq!(slow.request, None);
    }

    #[test]
    fn test_touch_end_without_start_is_ignored() {
        let mut input = aggregator();
        let outcome = input.handle(InputEvent::TouchEnd { y: 0.0, at: Instant::now() }, false);
        assert_eq!(outcome.request, None);
    }

    #[test]
    fn test_keys_map_to_requests() {
        let mut input = aggregator();
        let cases = [
            (NavKey::Down, NavRequest::Advance),
            (NavKey::PageDown, NavRequest::Advance),
            (NavKey::Up, NavRequest::Retreat),
            (NavKey::PageUp, NavRequest::Retreat),
            (NavKey::Home, NavRequest::First),
            (NavKey::End, NavRequest::Last),
        ];
        for (key, expected) in cases {
            // keys pass through even mid-transition; the navigator queues them
            let outcome = input.handle(InputEvent::Key(key), true);
            assert_eq!(outcome.request, Some(expected));
            assert!(outcome.prevent_default);
        }
    }

    #[test]
    fn test_disabled_lock_passes_everything_through() {
        let mut input = aggregator();
        input.set_enabled(false);
        let t0 = Instant::now();
        let wheel = input.handle(InputEvent::Wheel { delta_y: 500.0, at: t0 }, false);
        assert_eq!(wheel, InputOutcome::default());
        let key = input.handle(InputEvent::Key(NavKey::End), false);
        assert_eq!(key.request, None);
    }
}
