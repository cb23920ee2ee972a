use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use sectionlock_core::{
    AppConfig, InputEvent, NavRequest, PageSection, RequestOutcome, SectionLock,
};
use tracing::debug;

use crate::event::translate_mouse;
use crate::input::Action;
use crate::observers::{subscribe_all, Presentation, SharedPresentation};
use crate::page::PageLayout;
use crate::theme::Theme;
use crate::widgets::dot_at;

/// Rows taken by the navigation bar and the status bar
pub const CHROME_ROWS: u16 = 2;

/// Terminal application state
pub struct App {
    pub config: AppConfig,
    pub lock: SectionLock,
    pub page: PageLayout,
    pub presentation: SharedPresentation,
    /// Screen area the page is drawn in
    page_area: Rect,
    /// Cell where the left button went down
    press: Option<(u16, u16)>,
    /// Selected entry while the section menu is open
    menu: Option<usize>,
    /// First 'g' of a "gg" sequence was pressed
    pending_g: bool,
    /// Answer to the most recent navigation request
    pub last_outcome: Option<RequestOutcome>,
    pub should_quit: bool,
}

impl App {
    /// Build the page for a `terminal_cols` x `terminal_rows` terminal and scan it
    pub fn new(config: AppConfig, terminal_cols: u16, terminal_rows: u16, now: Instant) -> Self {
        let mut page = PageLayout::new(config.ui.sections.clone(), config.ui.row_height);
        let page_area = page_area(terminal_cols, terminal_rows);
        page.set_viewport_rows(page_area.height);

        let mut lock = SectionLock::new(config.clone());
        lock.refresh(&page, now);

        let presentation = Rc::new(RefCell::new(Presentation::resting_on(
            page.sections().first(),
        )));
        presentation.borrow_mut().set_clock(now);
        subscribe_all(&mut lock, &presentation, page.sections());

        Self {
            config,
            lock,
            page,
            presentation,
            page_area,
            press: None,
            menu: None,
            pending_g: false,
            last_outcome: None,
            should_quit: false,
        }
    }

    /// Palette for the current background tone
    pub fn theme(&self) -> Theme {
        Theme::for_tone(self.presentation.borrow().tone)
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu.is_some()
    }

    pub fn menu_selection(&self) -> Option<usize> {
        self.menu
    }

    pub fn pending_g(&self) -> bool {
        self.pending_g
    }

    pub fn current_section(&self) -> Option<&PageSection> {
        self.page.section(self.lock.state().current_index)
    }

    /// First page row visible at the current scroll offset
    pub fn scroll_row(&self) -> usize {
        self.page.units_to_row(self.lock.scroll_offset())
    }

    /// Whether the event loop should run at animation frame rate
    pub fn needs_frames(&self, now: Instant) -> bool {
        self.lock.needs_frames()
            || self.presentation.borrow().is_revealing(now, |index| {
                self.page.section(index).map_or(0, |s| s.body.len())
            })
    }

    /// Terminal was resized; the rescan waits for the resize to settle
    pub fn resize(&mut self, terminal_cols: u16, terminal_rows: u16, now: Instant) {
        self.page_area = page_area(terminal_cols, terminal_rows);
        if self.page.set_viewport_rows(self.page_area.height) {
            self.lock.note_resize(now);
        }
    }

    /// Frame callback
    pub fn tick(&mut self, now: Instant) {
        self.presentation.borrow_mut().set_clock(now);
        self.lock.poll_resize(&self.page, now);
        let frame = self.lock.tick(now);
        if let Some(outcome) = frame.chained {
            self.last_outcome = Some(outcome);
        }
    }

    pub fn handle_mouse(&mut self, mouse: &MouseEvent, now: Instant) {
        self.presentation.borrow_mut().set_clock(now);
        let cell = (mouse.column, mouse.row);
        let clicked = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.press = Some(cell);
                false
            }
            MouseEventKind::Up(MouseButton::Left) => self.press.take() == Some(cell),
            _ => false,
        };

        let Some(event) = translate_mouse(
            mouse,
            self.config.ui.wheel_notch_delta,
            self.config.ui.row_height,
            now,
        ) else {
            return;
        };

        let handled = self.lock.handle_input(event, now);
        if let Some(outcome) = handled.navigation {
            self.last_outcome = Some(outcome);
        }

        // Uncaptured wheel movement scrolls the page natively
        if let InputEvent::Wheel { delta_y, .. } = event {
            if !handled.input.prevent_default {
                let target = self.lock.scroll_offset() + delta_y;
                self.lock
                    .scroll_freely(target, self.page.viewport_height());
            }
        }

        // A click that didn't move is no swipe; on a dot it jumps there
        if clicked {
            let count = self.page.sections().len();
            if let Some(index) = dot_at(self.page_area, count, mouse.column, mouse.row) {
                self.navigate(NavRequest::Goto(index), now);
            }
        }
    }

    pub fn handle_action(&mut self, action: Action, now: Instant) {
        self.presentation.borrow_mut().set_clock(now);
        if action != Action::PendingG {
            self.pending_g = false;
        }

        match action {
            Action::Quit => self.should_quit = true,
            Action::Navigate(key) => {
                let handled = self.lock.handle_input(InputEvent::Key(key), now);
                if let Some(outcome) = handled.navigation {
                    self.last_outcome = Some(outcome);
                }
            }
            Action::GoTo(index) => self.navigate(NavRequest::Goto(index), now),
            Action::PendingG => self.pending_g = true,
            Action::ToggleMenu => self.toggle_menu(),
            Action::MenuUp => {
                if let Some(selected) = self.menu.as_mut() {
                    *selected = selected.saturating_sub(1);
                }
            }
            Action::MenuDown => {
                let last = self.page.sections().len().saturating_sub(1);
                if let Some(selected) = self.menu.as_mut() {
                    *selected = (*selected + 1).min(last);
                }
            }
            Action::MenuSelect => {
                if let Some(selected) = self.menu {
                    self.toggle_menu();
                    self.navigate(NavRequest::Goto(selected), now);
                }
            }
            Action::None => {}
        }
    }

    fn navigate(&mut self, request: NavRequest, now: Instant) {
        if self.menu.is_some() {
            // a jump from the open menu closes it first
            self.toggle_menu();
        }
        debug!("Navigation request {:?}", request);
        self.last_outcome = Some(self.lock.request(request, now));
    }

    /// Open or close the section menu. The lock is off while it is open.
    fn toggle_menu(&mut self) {
        self.menu = match self.menu {
            Some(_) => None,
            None => Some(self.lock.state().current_index),
        };
        self.lock.set_lock_enabled(self.menu.is_none());
    }
}

/// Page rows between the navigation bar and the status bar
fn page_area(terminal_cols: u16, terminal_rows: u16) -> Rect {
    Rect::new(0, 1, terminal_cols, terminal_rows.saturating_sub(CHROME_ROWS))
}
