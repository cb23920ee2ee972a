//! Section registry: the ordered list of page sections and their bounds

mod registry;
mod resize;

pub use registry::SectionRegistry;
pub use resize::ResizeDebouncer;

use serde::{Deserialize, Serialize};

/// One page section, as of the last registry refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Stable identifier taken from the document
    pub id: String,
    /// Position in document order, 0-based
    pub index: usize,
    /// Vertical offset from the document top
    pub offset_top: f64,
    pub height: f64,
}

impl Section {
    /// Offset of the section's bottom edge
    pub fn bottom(&self) -> f64 {
        self.offset_top + self.height
    }

    pub fn center(&self) -> f64 {
        self.offset_top + self.height / 2.0
    }
}

/// Raw bounds reported by a layout scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionBounds {
    pub id: String,
    pub offset_top: f64,
    pub height: f64,
}

impl SectionBounds {
    pub fn new(id: impl Into<String>, offset_top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            offset_top,
            height,
        }
    }
}

/// Anything that can measure the current layout's section markers
pub trait SectionSource {
    /// Scan for sections in document order
    fn scan(&self) -> Vec<SectionBounds>;
}

impl SectionSource for [SectionBounds] {
    fn scan(&self) -> Vec<SectionBounds> {
        self.to_vec()
    }
}

impl SectionSource for Vec<SectionBounds> {
    fn scan(&self) -> Vec<SectionBounds> {
        self.clone()
    }
}

/// Sections of equal height stacked from the top, one per id
pub fn stacked<S: AsRef<str>>(ids: &[S], height: f64) -> Vec<SectionBounds> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| SectionBounds::new(id.as_ref(), i as f64 * height, height))
        .collect()
}
