//! The demo page: configured sections laid out as a vertical stack of
//! terminal rows. Each section fills at least one viewport.

use sectionlock_core::{PageSection, SectionBounds, SectionSource};

/// Rows reserved around a section's body (title, rule, padding)
const SECTION_CHROME_ROWS: usize = 4;

#[derive(Debug, Clone)]
pub struct PageLayout {
    sections: Vec<PageSection>,
    viewport_rows: u16,
    /// Controller units per terminal row
    row_height: f64,
}

impl PageLayout {
    pub fn new(sections: Vec<PageSection>, row_height: f64) -> Self {
        Self {
            sections,
            viewport_rows: 1,
            row_height: row_height.max(1.0),
        }
    }

    pub fn sections(&self) -> &[PageSection] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&PageSection> {
        self.sections.get(index)
    }

    pub fn viewport_rows(&self) -> u16 {
        self.viewport_rows
    }

    /// Update the visible page height. Returns true if it changed.
    pub fn set_viewport_rows(&mut self, rows: u16) -> bool {
        let rows = rows.max(1);
        if rows == self.viewport_rows {
            return false;
        }
        self.viewport_rows = rows;
        true
    }

    /// Viewport height in controller units
    pub fn viewport_height(&self) -> f64 {
        self.rows_to_units(self.viewport_rows as usize)
    }

    /// Height of one section in rows
    pub fn section_rows(&self, section: &PageSection) -> usize {
        (section.body.len() + SECTION_CHROME_ROWS).max(self.viewport_rows as usize)
    }

    /// Top row of every section, in order
    pub fn section_tops(&self) -> Vec<usize> {
        self.sections
            .iter()
            .scan(0usize, |top, section| {
                let this = *top;
                *top += self.section_rows(section);
                Some(this)
            })
            .collect()
    }

    pub fn total_rows(&self) -> usize {
        self.sections.iter().map(|s| self.section_rows(s)).sum()
    }

    pub fn rows_to_units(&self, rows: usize) -> f64 {
        rows as f64 * self.row_height
    }

    /// First visible row for a scroll offset, rounded to the nearest row
    pub fn units_to_row(&self, offset: f64) -> usize {
        (offset / self.row_height).round().max(0.0) as usize
    }
}

impl SectionSource for PageLayout {
    fn scan(&self) -> Vec<SectionBounds> {
        self.sections
            .iter()
            .zip(self.section_tops())
            .map(|(section, top)| {
                SectionBounds::new(
                    section.id.clone(),
                    self.rows_to_units(top),
                    self.rows_to_units(self.section_rows(section)),
                )
            })
            .collect()
    }
}
