use std::time::Instant;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::App;
use crate::widgets::{MenuWidget, NavBarWidget, PageViewWidget, SectionDotsWidget, StatusBarWidget};

/// Draw one frame: navigation bar, page, status bar, then the menu on top
pub fn draw(frame: &mut Frame, app: &App, now: Instant) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    NavBarWidget::render(frame, layout[0], app);
    PageViewWidget::render(frame, layout[1], app, now);
    SectionDotsWidget::render(frame, layout[1], app);
    StatusBarWidget::render(frame, layout[2], app);

    if app.is_menu_open() {
        MenuWidget::render(frame, app);
    }
}
