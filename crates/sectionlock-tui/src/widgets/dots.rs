use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

/// Vertical column of section indicator dots along the right edge
pub struct SectionDotsWidget;

impl SectionDotsWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let count = app.page.sections().len();
        let Some(column) = dot_column(area, count) else {
            return;
        };

        let theme = app.theme();
        let state = app.lock.state();
        let lines: Vec<Line> = (0..count)
            .flat_map(|index| {
                let dot = if index == state.current_index {
                    Span::styled("●", Style::default().fg(theme.accent))
                } else if state.target_index == Some(index) {
                    Span::styled("●", Style::default().fg(theme.accent_dim))
                } else {
                    Span::styled("○", Style::default().fg(theme.grey0))
                };
                [Line::from(dot), Line::default()]
            })
            .take(count * 2 - 1)
            .collect();

        frame.render_widget(Paragraph::new(lines), column);
    }
}

/// Cells taken by the dots of `count` sections: one column, vertically
/// centred in `area`, a blank row between neighbours.
pub fn dot_column(area: Rect, count: usize) -> Option<Rect> {
    if count == 0 || area.width < 3 {
        return None;
    }
    let lines = (count * 2 - 1).min(area.height as usize) as u16;
    Some(Rect::new(
        area.x + area.width - 2,
        area.y + (area.height - lines) / 2,
        1,
        lines,
    ))
}

/// Section whose dot is drawn at `(column, row)`
pub fn dot_at(area: Rect, count: usize, column: u16, row: u16) -> Option<usize> {
    let dots = dot_column(area, count)?;
    if column != dots.x || row < dots.y || row >= dots.y + dots.height {
        return None;
    }
    let line = row - dots.y;
    (line % 2 == 0).then_some(line as usize / 2)
}
