use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

/// Top bar with one link per section; the active one is highlighted
pub struct NavBarWidget;

impl NavBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.theme();
        let bar = Style::default().fg(theme.fg0).bg(theme.bg1);
        let active_id = app.presentation.borrow().active_id.clone();

        let mut spans = vec![Span::styled(
            " sectionlock ",
            bar.fg(theme.accent).add_modifier(Modifier::BOLD),
        )];
        for section in app.page.sections() {
            spans.push(Span::styled(" ", bar));
            let style = if active_id.as_deref() == Some(section.id.as_str()) {
                Style::default()
                    .fg(theme.bg0)
                    .bg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                bar.fg(theme.grey1)
            };
            spans.push(Span::styled(format!(" {} ", section.title), style));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).style(bar), area);
    }
}
