//! Navigation: the section state machine and its observers

mod machine;
mod observer;

pub use machine::{Frame, NavigationState, Navigator, RequestOutcome};
pub use observer::{ObserverRegistry, SectionObserver, SubscriptionId};

use serde::{Deserialize, Serialize};

/// Relative movement through the section list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Signed unit value: +1 forward, -1 backward
    pub fn signum(self) -> i8 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// A request for the navigator, relative or absolute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavRequest {
    Advance,
    Retreat,
    First,
    Last,
    Goto(usize),
}

impl NavRequest {
    pub fn direction(self) -> Option<Direction> {
        match self {
            NavRequest::Advance => Some(Direction::Forward),
            NavRequest::Retreat => Some(Direction::Backward),
            _ => None,
        }
    }

    /// Target index for this request, or `None` when it would leave
    /// `[0, len)`. There is no wraparound.
    pub fn resolve(self, current: usize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let target = match self {
            NavRequest::Advance => current.checked_add(1)?,
            NavRequest::Retreat => current.checked_sub(1)?,
            NavRequest::First => 0,
            NavRequest::Last => len - 1,
            NavRequest::Goto(index) => index,
        };
        (target < len).then_some(target)
    }
}
