use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

/// Section menu shown over the page while the lock is off
pub struct MenuWidget;

impl MenuWidget {
    pub fn render(frame: &mut Frame, app: &App) {
        let Some(selected) = app.menu_selection() else {
            return;
        };
        let theme = app.theme();
        let area = frame.area();
        let sections = app.page.sections();

        let widest = sections
            .iter()
            .map(|s| s.title.width())
            .max()
            .unwrap_or(0) as u16;
        let popup_width = (widest + 12).max(30).min(area.width.saturating_sub(4));
        let popup_height = (sections.len() as u16 + 4).min(area.height.saturating_sub(2));
        let popup_area = centered_rect(popup_width, popup_height, area);

        // Clear the background area
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Sections ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg1));
        let inner_area = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner_area);

        let entries: Vec<Line> = sections
            .iter()
            .enumerate()
            .map(|(index, section)| {
                let style = if index == selected {
                    Style::default()
                        .fg(theme.bg0)
                        .bg(theme.accent)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.fg0)
                };
                Line::from(vec![
                    Span::styled(format!(" {} ", index + 1), Style::default().fg(theme.grey1)),
                    Span::styled(format!(" {} ", section.title), style),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(entries), chunks[0]);

        let hint = Paragraph::new(Line::from(Span::styled(
            "j/k move  enter go  esc close",
            Style::default().fg(theme.grey1),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(hint, chunks[1]);
    }
}

/// Helper function to create a centered rect
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect(30, 10, area), Rect::new(35, 15, 30, 10));
        // larger than the area pins to the corner
        assert_eq!(centered_rect(120, 50, area), Rect::new(0, 0, 120, 50));
    }
}
