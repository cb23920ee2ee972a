//! Headless replay of recorded input
//!
//! A trace is a JSON document holding a section layout and a timestamped
//! event list. Replaying it drives a [`SectionLock`] frame by frame and
//! reports every navigation decision and arrival.

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::context::SectionLock;
use crate::input::{InputEvent, NavKey};
use crate::nav::{NavRequest, RequestOutcome};
use crate::section::SectionBounds;
use crate::{Error, Result};

/// Upper bound on frames simulated after the last event
const MAX_SETTLE_FRAMES: usize = 100_000;

/// Longest trace accepted, in milliseconds (one day)
pub const MAX_TRACE_MS: u64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trace {
    /// Initial layout, in document order
    pub sections: Vec<SectionBounds>,
    /// Render-loop interval used between events
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: u64,
    /// Viewport height, used by free scrolling
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
    pub events: Vec<TraceEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Milliseconds since the start of the trace
    pub at_ms: u64,
    #[serde(flatten)]
    pub input: TraceInput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceInput {
    Wheel { delta_y: f64 },
    TouchStart { y: f64 },
    TouchEnd { y: f64 },
    Key { key: NavKey },
    /// Direct request, as a nav link click would issue
    Request { request: NavRequest },
    GoTo { id: String },
    /// Viewport resize, with the layout measured afterwards
    Resize { sections: Vec<SectionBounds> },
    Lock { enabled: bool },
    Scroll { offset: f64 },
}

/// One line of the replay report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayEntry {
    pub at_ms: u64,
    #[serde(flatten)]
    pub kind: ReplayKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplayKind {
    Started { from: usize, to: usize },
    Queued,
    Ignored,
    Arrived { index: usize, id: String },
    Rescanned { sections: usize },
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub entries: Vec<ReplayEntry>,
    pub final_index: usize,
    pub final_offset: f64,
}

impl ReplayReport {
    pub fn arrivals(&self) -> Vec<usize> {
        self.entries
            .iter()
            .filter_map(|entry| match entry.kind {
                ReplayKind::Arrived { index, .. } => Some(index),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            write!(f, "{:>7}ms  ", entry.at_ms)?;
            match &entry.kind {
                ReplayKind::Started { from, to } => writeln!(f, "start    {} -> {}", from, to)?,
                ReplayKind::Queued => writeln!(f, "queued")?,
                ReplayKind::Ignored => writeln!(f, "ignored")?,
                ReplayKind::Arrived { index, id } => writeln!(f, "arrived  {} ({})", index, id)?,
                ReplayKind::Rescanned { sections } => writeln!(f, "rescan   {} sections", sections)?,
            }
        }
        write!(
            f,
            "final: section {} at offset {:.1}",
            self.final_index, self.final_offset
        )
    }
}

fn default_frame_interval() -> u64 {
    16
}

fn default_viewport_height() -> f64 {
    800.0
}

impl Trace {
    pub fn from_json(text: &str) -> Result<Self> {
        let trace: Trace = serde_json::from_str(text)?;
        trace.validate()?;
        Ok(trace)
    }

    fn validate(&self) -> Result<()> {
        if self.frame_interval_ms == 0 {
            return Err(Error::Trace("frame_interval_ms must be positive".to_string()));
        }
        if self.frame_interval_ms > MAX_TRACE_MS {
            return Err(Error::Trace(format!(
                "frame_interval_ms {} exceeds {}ms",
                self.frame_interval_ms, MAX_TRACE_MS
            )));
        }
        if let Some(event) = self.events.iter().find(|event| event.at_ms > MAX_TRACE_MS) {
            return Err(Error::Trace(format!(
                "event at {}ms is past the {}ms limit",
                event.at_ms, MAX_TRACE_MS
            )));
        }
        if let Some(pair) = self.events.windows(2).find(|pair| pair[1].at_ms < pair[0].at_ms) {
            return Err(Error::Trace(format!(
                "events out of order: {}ms after {}ms",
                pair[1].at_ms, pair[0].at_ms
            )));
        }
        Ok(())
    }
}

/// Replay a trace against a fresh controller
pub fn replay(trace: &Trace, config: AppConfig) -> Result<ReplayReport> {
    trace.validate()?;

    let start = Instant::now();
    let at = |ms: u64| start + Duration::from_millis(ms);

    let mut lock = SectionLock::new(config);
    lock.refresh(&trace.sections, start);
    let mut layout = trace.sections.clone();

    let mut entries = Vec::new();
    let mut clock = 0u64;

    for event in &trace.events {
        // deliver frames up to the event time
        while clock + trace.frame_interval_ms <= event.at_ms {
            if !lock.needs_frames() {
                // nothing moves until the event; jump to the last frame before it
                let idle = (event.at_ms - clock) / trace.frame_interval_ms;
                clock += idle * trace.frame_interval_ms;
                break;
            }
            clock += trace.frame_interval_ms;
            deliver_frame(&mut lock, &layout, clock, at(clock), &mut entries);
        }

        let now = at(event.at_ms);
        let outcome = match &event.input {
            TraceInput::Wheel { delta_y } => {
                lock.handle_input(InputEvent::Wheel { delta_y: *delta_y, at: now }, now)
                    .navigation
            }
            TraceInput::TouchStart { y } => {
                lock.handle_input(InputEvent::TouchStart { y: *y, at: now }, now)
                    .navigation
            }
            TraceInput::TouchEnd { y } => {
                lock.handle_input(InputEvent::TouchEnd { y: *y, at: now }, now)
                    .navigation
            }
            TraceInput::Key { key } => lock.handle_input(InputEvent::Key(*key), now).navigation,
            TraceInput::Request { request } => Some(lock.request(*request, now)),
            TraceInput::GoTo { id } => Some(lock.go_to_id(id, now)),
            TraceInput::Resize { sections } => {
                layout = sections.clone();
                lock.note_resize(now);
                None
            }
            TraceInput::Lock { enabled } => {
                lock.set_lock_enabled(*enabled);
                None
            }
            TraceInput::Scroll { offset } => {
                lock.scroll_freely(*offset, trace.viewport_height);
                None
            }
        };
        if let Some(outcome) = outcome {
            entries.push(ReplayEntry {
                at_ms: event.at_ms,
                kind: outcome.into(),
            });
        }
    }

    let mut settle_frames = 0;
    while lock.needs_frames() && settle_frames < MAX_SETTLE_FRAMES {
        clock += trace.frame_interval_ms;
        settle_frames += 1;
        deliver_frame(&mut lock, &layout, clock, at(clock), &mut entries);
    }

    Ok(ReplayReport {
        entries,
        final_index: lock.state().current_index,
        final_offset: lock.scroll_offset(),
    })
}

/// One render-loop callback plus the resize check that rides on it
fn deliver_frame(
    lock: &mut SectionLock,
    layout: &[SectionBounds],
    at_ms: u64,
    now: Instant,
    entries: &mut Vec<ReplayEntry>,
) {
    let frame = lock.tick(now);
    if let Some(index) = frame.arrived {
        let id = lock
            .sections()
            .get(index)
            .map(|s| s.id.clone())
            .unwrap_or_default();
        entries.push(ReplayEntry {
            at_ms,
            kind: ReplayKind::Arrived { index, id },
        });
    }
    if let Some(outcome) = frame.chained {
        entries.push(ReplayEntry {
            at_ms,
            kind: outcome.into(),
        });
    }
    if lock.poll_resize(layout, now) {
        entries.push(ReplayEntry {
            at_ms,
            kind: ReplayKind::Rescanned {
                sections: lock.sections().len(),
            },
        });
    }
}

impl From<RequestOutcome> for ReplayKind {
    fn from(outcome: RequestOutcome) -> Self {
        match outcome {
            RequestOutcome::Started { from, to } => ReplayKind::Started { from, to },
            RequestOutcome::Queued => ReplayKind::Queued,
            RequestOutcome::Ignored => ReplayKind::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE: &str = r#"{
        "sections": [
            { "id": "hero", "offset_top": 0, "height": 800 },
            { "id": "about", "offset_top": 800, "height": 800 },
            { "id": "gallery", "offset_top": 1600, "height": 800 },
            { "id": "works", "offset_top": 2400, "height": 800 },
            { "id": "contact", "offset_top": 3200, "height": 800 }
        ],
        "events": EVENTS
    }"#;

    fn trace(events: &str) -> Trace {
        Trace::from_json(&FIVE.replace("EVENTS", events)).unwrap()
    }

    #[test]
    fn test_three_rapid_advances_chain_one_extra() {
        let trace = trace(
            r#"[
                { "at_ms": 0, "kind": "key", "key": "down" },
                { "at_ms": 100, "kind": "key", "key": "down" },
                { "at_ms": 150, "kind": "key", "key": "page_down" },
                { "at_ms": 200, "kind": "request", "request": "advance" }
            ]"#,
        );
        let report = replay(&trace, AppConfig::default()).unwrap();

        assert_eq!(report.arrivals(), [1, 2]);
        assert_eq!(report.final_index, 2);
        assert_eq!(report.final_offset, 1600.0);
        let queued = report
            .entries
            .iter()
            .filter(|e| e.kind == ReplayKind::Queued)
            .count();
        assert_eq!(queued, 3);
    }

    #[test]
    fn test_swipes() {
        let trace = trace(
            r#"[
                { "at_ms": 0, "kind": "touch_start", "y": 500 },
                { "at_ms": 250, "kind": "touch_end", "y": 460 },
                { "at_ms": 1000, "kind": "touch_start", "y": 500 },
                { "at_ms": 1200, "kind": "touch_end", "y": 410 }
            ]"#,
        );
        let report = replay(&trace, AppConfig::default()).unwrap();

        assert_eq!(report.entries[0].at_ms, 1200);
        assert_eq!(report.entries[0].kind, ReplayKind::Started { from: 0, to: 1 });
        assert_eq!(report.arrivals(), [1]);
    }

    #[test]
    fn test_advance_at_last_section_is_ignored() {
        let trace = trace(
            r#"[
                { "at_ms": 0, "kind": "go_to", "id": "contact" },
                { "at_ms": 5000, "kind": "key", "key": "down" }
            ]"#,
        );
        let report = replay(&trace, AppConfig::default()).unwrap();
        assert_eq!(report.final_index, 4);
        assert_eq!(report.entries.last().unwrap().kind, ReplayKind::Ignored);
    }

    #[test]
    fn test_resize_rescans_after_quiet_period() {
        let trace = trace(
            r#"[
                { "at_ms": 0, "kind": "resize", "sections": [
                    { "id": "hero", "offset_top": 0, "height": 600 },
                    { "id": "about", "offset_top": 600, "height": 600 }
                ] },
                { "at_ms": 50, "kind": "resize", "sections": [
                    { "id": "hero", "offset_top": 0, "height": 700 },
                    { "id": "about", "offset_top": 700, "height": 700 }
                ] },
                { "at_ms": 500, "kind": "key", "key": "end" }
            ]"#,
        );
        let report = replay(&trace, AppConfig::default()).unwrap();

        let rescans: Vec<_> = report
            .entries
            .iter()
            .filter(|e| matches!(e.kind, ReplayKind::Rescanned { .. }))
            .collect();
        assert_eq!(rescans.len(), 1);
        assert_eq!(report.final_index, 1);
        assert_eq!(report.final_offset, 700.0);
    }

    #[test]
    fn test_out_of_order_events_rejected() {
        let err = Trace::from_json(&FIVE.replace(
            "EVENTS",
            r#"[
                { "at_ms": 10, "kind": "key", "key": "down" },
                { "at_ms": 5, "kind": "key", "key": "up" }
            ]"#,
        ))
        .unwrap_err();
        assert!(matches!(err, Error::Trace(_)));
    }

    #[test]
    fn test_times_past_one_day_rejected() {
        let late = FIVE.replace(
            "EVENTS",
            r#"[{ "at_ms": 18446744073709551615, "kind": "key", "key": "down" }]"#,
        );
        assert!(matches!(Trace::from_json(&late), Err(Error::Trace(_))));

        let mut trace = trace(r#"[{ "at_ms": 0, "kind": "key", "key": "down" }]"#);
        trace.frame_interval_ms = u64::MAX;
        assert!(matches!(
            replay(&trace, AppConfig::default()),
            Err(Error::Trace(_))
        ));

        trace.frame_interval_ms = 16;
        trace.events[0].at_ms = MAX_TRACE_MS + 1;
        assert!(matches!(
            replay(&trace, AppConfig::default()),
            Err(Error::Trace(_))
        ));
    }

    #[test]
    fn test_long_idle_gap_replays() {
        let trace = trace(&format!(
            r#"[
                {{ "at_ms": 0, "kind": "key", "key": "down" }},
                {{ "at_ms": {}, "kind": "key", "key": "down" }}
            ]"#,
            MAX_TRACE_MS
        ));
        let report = replay(&trace, AppConfig::default()).unwrap();
        assert_eq!(report.arrivals(), [1, 2]);
        assert_eq!(report.final_offset, 1600.0);
    }

    #[test]
    fn test_empty_layout_replays_cleanly() {
        let trace = Trace::from_json(
            r#"{ "sections": [], "events": [
                { "at_ms": 0, "kind": "wheel", "delta_y": 400 },
                { "at_ms": 10, "kind": "key", "key": "end" }
            ] }"#,
        )
        .unwrap();
        let report = replay(&trace, AppConfig::default()).unwrap();
        assert_eq!(report.final_index, 0);
        assert_eq!(report.entries.len(), 2);
        assert!(report.entries.iter().all(|e| e.kind == ReplayKind::Ignored));
    }
}
