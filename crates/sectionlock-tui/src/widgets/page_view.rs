use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::theme::Theme;

/// Rows a section's content occupies besides its body
const HEADER_ROWS: usize = 3;

pub struct PageViewWidget;

impl PageViewWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App, now: Instant) {
        let lines = page_lines(app, now);
        let scroll = app.scroll_row().min(u16::MAX as usize) as u16;
        frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), area);
    }
}

/// Every row of the page, top to bottom. Each section is drawn in its own
/// tone with the content centred vertically; body lines that haven't been
/// revealed yet are left blank.
pub fn page_lines(app: &App, now: Instant) -> Vec<Line<'static>> {
    let presentation = app.presentation.borrow();
    let count = app.page.sections().len();
    let mut lines = Vec::with_capacity(app.page.total_rows());

    for (index, section) in app.page.sections().iter().enumerate() {
        let theme = Theme::for_tone(section.tone);
        let base = Style::default().fg(theme.fg0).bg(theme.bg0);
        let rows = app.page.section_rows(section);
        let shown = presentation.visible_lines(index, now, section.body.len());
        let active = presentation.active_id.as_deref() == Some(section.id.as_str());

        let content_rows = section.body.len() + HEADER_ROWS;
        let top_pad = rows.saturating_sub(content_rows) / 2;
        let start = lines.len();

        lines.extend((0..top_pad).map(|_| Line::default().style(base)));

        let title_style = if active {
            base.fg(theme.accent).add_modifier(Modifier::BOLD)
        } else {
            base.fg(theme.fg1).add_modifier(Modifier::BOLD)
        };
        lines.push(
            Line::from(vec![
                Span::styled(format!("{:02} / {:02}  ", index + 1, count), base.fg(theme.grey1)),
                Span::styled(section.title.clone(), title_style),
            ])
            .style(base)
            .centered(),
        );
        let rule_width = section.title.width() + 9;
        lines.push(
            Line::from(Span::styled("─".repeat(rule_width), base.fg(theme.accent_dim)))
                .style(base)
                .centered(),
        );
        lines.push(Line::default().style(base));

        for (i, text) in section.body.iter().enumerate() {
            let line = if i < shown {
                Line::from(text.clone())
            } else {
                Line::default()
            };
            lines.push(line.style(base).centered());
        }

        let used = lines.len() - start;
        lines.extend((used..rows).map(|_| Line::default().style(base)));
    }

    lines
}
