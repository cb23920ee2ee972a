use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use sectionlock_core::InputEvent;
use tokio::sync::mpsc;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::warn;

/// How long the reader blocks before checking whether anyone still listens
const READER_POLL: Duration = Duration::from_millis(50);

/// Application events
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Wheel or button activity
    Mouse(MouseEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// Frame or idle tick
    Tick,
}

/// Event pump: terminal events from a blocking reader task, plus a frame
/// timer that runs at `frame_interval` while something is moving and at
/// `tick_rate_ms` otherwise.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    idle: Interval,
    frame: Interval,
}

impl EventHandler {
    /// Must be called from within a tokio runtime
    pub fn new(tick_rate_ms: u64, frame_interval: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::task::spawn_blocking(move || read_terminal_events(tx));

        let mut idle = interval(Duration::from_millis(tick_rate_ms.max(1)));
        idle.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut frame = interval(frame_interval.max(Duration::from_millis(1)));
        frame.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Self { rx, idle, frame }
    }

    /// Wait for the next event. Returns None once the reader has stopped.
    pub async fn next(&mut self, animating: bool) -> Option<AppEvent> {
        tokio::select! {
            event = self.rx.recv() => event,
            _ = self.frame.tick(), if animating => Some(AppEvent::Tick),
            _ = self.idle.tick(), if !animating => Some(AppEvent::Tick),
        }
    }
}

fn read_terminal_events(tx: mpsc::UnboundedSender<AppEvent>) {
    while !tx.is_closed() {
        match event::poll(READER_POLL) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                warn!("Terminal event poll failed: {}", e);
                break;
            }
        }

        let event = match event::read() {
            // Only handle key press events, ignore release events
            // (crossterm 0.27+ sends release events on some systems)
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
            Ok(Event::Mouse(mouse)) => AppEvent::Mouse(mouse),
            Ok(Event::Resize(w, h)) => AppEvent::Resize(w, h),
            Ok(_) => continue,
            Err(e) => {
                warn!("Terminal event read failed: {}", e);
                break;
            }
        };

        if tx.send(event).is_err() {
            break;
        }
    }
}

/// Map a terminal mouse event onto controller input.
///
/// One wheel notch becomes `notch_delta` units of wheel movement. A left
/// button press and release act as the start and end of a touch swipe,
/// with rows scaled by `row_height`.
pub fn translate_mouse(
    mouse: &MouseEvent,
    notch_delta: f64,
    row_height: f64,
    now: Instant,
) -> Option<InputEvent> {
    let y = mouse.row as f64 * row_height;
    match mouse.kind {
        MouseEventKind::ScrollDown => Some(InputEvent::Wheel {
            delta_y: notch_delta,
            at: now,
        }),
        MouseEventKind::ScrollUp => Some(InputEvent::Wheel {
            delta_y: -notch_delta,
            at: now,
        }),
        MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::TouchStart { y, at: now }),
        MouseEventKind::Up(MouseButton::Left) => Some(InputEvent::TouchEnd { y, at: now }),
        _ => None,
    }
}
