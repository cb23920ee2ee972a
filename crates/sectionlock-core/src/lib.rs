pub mod config;
pub mod context;
pub mod error;
pub mod input;
pub mod nav;
pub mod scroll;
pub mod section;
pub mod trace;

pub use config::{AppConfig, EasingType, NavPreset, PageSection, Tone};
pub use context::{Handled, SectionLock};
pub use error::{Error, Result};
pub use input::{InputAggregator, InputEvent, InputOutcome, NavKey};
pub use nav::{NavRequest, NavigationState, RequestOutcome, SectionObserver, SubscriptionId};
pub use section::{Section, SectionBounds, SectionRegistry, SectionSource};
