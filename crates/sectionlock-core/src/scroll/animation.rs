//! Snap-scroll animation controller
//!
//! Combines easing functions and timing utilities into a single animator
//! that the navigation state machine samples once per frame.

use std::time::{Duration, Instant};

use super::easing::EasingType;
use super::timing::{is_complete, lerp, progress};

/// Active scroll animation state
#[derive(Debug, Clone)]
struct ActiveAnimation {
    /// Animation start time
    start: Instant,
    /// Starting scroll offset
    from: f64,
    /// Target scroll offset
    to: f64,
    /// Animation duration
    duration: Duration,
}

/// Result of sampling the animator for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSample {
    /// Scroll offset to apply this frame
    pub offset: f64,
    /// True on the frame that reached the target
    pub finished: bool,
}

/// Scroll animation controller
///
/// Call `start()` to begin a transition, then `sample()` on every frame
/// to get the interpolated offset. Progress is derived from elapsed time,
/// so irregular or paused frame delivery only changes how many samples are
/// taken, never where the animation ends.
#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    /// Current active animation (if any)
    animation: Option<ActiveAnimation>,
    /// Easing applied to every animation
    easing: EasingType,
    /// Duration applied to every animation
    duration: Duration,
    /// Last sampled offset
    offset: f64,
}

impl Default for ScrollAnimator {
    fn default() -> Self {
        Self::new(Duration::from_millis(1200), EasingType::InOutCubic)
    }
}

impl ScrollAnimator {
    pub fn new(duration: Duration, easing: EasingType) -> Self {
        Self {
            animation: None,
            easing,
            duration,
            offset: 0.0,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn easing(&self) -> EasingType {
        self.easing
    }

    /// Check if an animation is currently active
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Final offset of the running animation, or the current offset
    pub fn target(&self) -> f64 {
        self.animation.as_ref().map(|a| a.to).unwrap_or(self.offset)
    }

    /// Last sampled offset
    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Begin animating from `from` to `to`, replacing any running animation
    pub fn start(&mut self, from: f64, to: f64, now: Instant) {
        self.offset = from;
        self.animation = Some(ActiveAnimation {
            start: now,
            from,
            to,
            duration: self.duration,
        });
    }

    /// Advance the animation to `now`
    ///
    /// Returns `None` when nothing is animating.
    pub fn sample(&mut self, now: Instant) -> Option<ScrollSample> {
        let anim = self.animation.as_ref()?;

        if is_complete(anim.start, now, anim.duration) {
            self.offset = anim.to;
            self.animation = None;
            return Some(ScrollSample {
                offset: self.offset,
                finished: true,
            });
        }

        let t = progress(anim.start, now, anim.duration);
        self.offset = lerp(anim.from, anim.to, self.easing.apply(t));
        Some(ScrollSample {
            offset: self.offset,
            finished: false,
        })
    }
}
