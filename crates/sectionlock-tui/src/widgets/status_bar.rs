use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use sectionlock_core::{NavRequest, RequestOutcome};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.theme();
        let bar = Style::default().fg(theme.fg0).bg(theme.bg2);

        let mode_str = if app.lock.is_lock_enabled() {
            " LOCKED "
        } else {
            " FREE "
        };
        let status_text = status_text(app);
        let help_hint = " q:quit j/k:section 1-9:jump m:menu ";

        let used = mode_str.width() + status_text.width() + help_hint.width();
        let padding_len = (area.width as usize).saturating_sub(used);

        let line = Line::from(vec![
            Span::styled(
                mode_str,
                Style::default()
                    .fg(theme.bg0)
                    .bg(if app.lock.is_lock_enabled() {
                        theme.accent
                    } else {
                        theme.warning
                    })
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(status_text, bar),
            Span::styled(" ".repeat(padding_len), bar),
            Span::styled(help_hint, bar.fg(theme.grey1)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Section, motion and camera summary
pub fn status_text(app: &App) -> String {
    let state = app.lock.state();
    let count = app.page.sections().len();
    let section = app
        .current_section()
        .map(|s| s.id.as_str())
        .unwrap_or("-");

    let mut text = format!(" {}/{} {}", (state.current_index + 1).min(count), count, section);

    if let Some(target) = state.target_index {
        text.push_str(&format!(" -> {}", target + 1));
    }
    if let Some(pending) = state.pending {
        text.push_str(&format!(" | next: {}", describe(pending)));
    }
    if let Some(RequestOutcome::Ignored) = app.last_outcome {
        text.push_str(" | at edge");
    }
    text.push_str(&format!(
        " | z {:.0}",
        app.presentation.borrow().camera_depth
    ));
    text
}

fn describe(request: NavRequest) -> String {
    match request {
        NavRequest::Advance => "down".to_string(),
        NavRequest::Retreat => "up".to_string(),
        NavRequest::First => "first".to_string(),
        NavRequest::Last => "last".to_string(),
        NavRequest::Goto(index) => format!("#{}", index + 1),
    }
}
