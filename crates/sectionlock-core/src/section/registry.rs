use std::collections::HashSet;

use tracing::{info, warn};

use super::{Section, SectionSource};

/// Ordered snapshot of the page's sections
///
/// Rebuilt from a [`SectionSource`] at startup and after every debounced
/// resize. An empty registry is valid: navigation over it does nothing.
#[derive(Debug, Clone, Default)]
pub struct SectionRegistry {
    sections: Vec<Section>,
}

impl SectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry straight from a source
    pub fn from_source(source: &(impl SectionSource + ?Sized)) -> Self {
        let mut registry = Self::new();
        registry.refresh(source);
        registry
    }

    /// Rescan the layout and replace the snapshot
    ///
    /// Sections are ordered by offset, negative heights become zero, and a
    /// section starting inside its predecessor is pushed down to the
    /// predecessor's bottom edge.
    pub fn refresh(&mut self, source: &(impl SectionSource + ?Sized)) -> &[Section] {
        let mut bounds = source.scan();
        // stable sort keeps document order for equal offsets
        bounds.sort_by(|a, b| a.offset_top.total_cmp(&b.offset_top));

        let mut seen = HashSet::new();
        let mut sections: Vec<Section> = Vec::with_capacity(bounds.len());
        for (index, b) in bounds.into_iter().enumerate() {
            if !seen.insert(b.id.clone()) {
                warn!("Duplicate section id '{}', lookups will use the first", b.id);
            }

            let mut offset_top = b.offset_top;
            if let Some(prev) = sections.last() {
                if offset_top < prev.bottom() {
                    warn!(
                        "Section '{}' overlaps '{}', moving it from {} to {}",
                        b.id,
                        prev.id,
                        offset_top,
                        prev.bottom()
                    );
                    offset_top = prev.bottom();
                }
            }

            sections.push(Section {
                id: b.id,
                index,
                offset_top,
                height: b.height.max(0.0),
            });
        }

        if !self.sections.is_empty() && self.sections.len() != sections.len() {
            warn!(
                "Section count changed from {} to {} on refresh",
                self.sections.len(),
                sections.len()
            );
        }
        info!("Section registry refreshed: {} sections", sections.len());

        self.sections = sections;
        &self.sections
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn first(&self) -> Option<&Section> {
        self.sections.first()
    }

    pub fn last(&self) -> Option<&Section> {
        self.sections.last()
    }

    /// Index of the first section with the given id
    pub fn find(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    /// Section whose centre is closest to the viewport centre
    pub fn index_at(&self, scroll_offset: f64, viewport_height: f64) -> Option<usize> {
        let viewport_center = scroll_offset + viewport_height / 2.0;
        self.sections
            .iter()
            .map(|s| (s.index, (s.center() - viewport_center).abs()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }
}
