//! Pure easing functions mapping transition progress [0, 1] to [0, 1]

pub use crate::config::EasingType;

impl EasingType {
    /// Eased value in [0, 1] for progress `t` (clamped to [0, 1])
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::None => if t < 1.0 { 0.0 } else { 1.0 },
            EasingType::Linear => t,
            EasingType::Cubic => ease_out_power(t, 3),
            EasingType::Quintic => ease_out_power(t, 5),
            EasingType::EaseOut => exponential_ease_out(t),
            EasingType::InOutCubic => ease_in_out_cubic(t),
        }
    }
}

/// Cubic ease-in-out: 4t³ below the midpoint, 1 - (-2t+2)³/2 above
#[inline]
pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let inv = -2.0 * t + 2.0;
        1.0 - inv * inv * inv / 2.0
    }
}

/// Polynomial ease-out: f(t) = 1 - (1-t)^n
#[inline]
fn ease_out_power(t: f64, n: i32) -> f64 {
    1.0 - (1.0 - t).powi(n)
}

/// Exponential ease-out: f(t) = 1 - 2^(-10t), pinned to 1 at the end
#[inline]
fn exponential_ease_out(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f64.powf(-10.0 * t)
    }
}
