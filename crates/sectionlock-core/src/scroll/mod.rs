//! Smooth snap-scroll animation
//!
//! - `easing` - pure easing curves (in-out cubic, cubic, quintic, exponential)
//! - `timing` - progress and interpolation helpers
//! - `animation` - the per-frame animator built from the two

pub mod animation;
pub mod easing;
pub mod timing;

pub use animation::{ScrollAnimator, ScrollSample};
pub use easing::{ease_in_out_cubic, EasingType};
