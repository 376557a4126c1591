//! Dismissible error banner for failed transfer fetches.
//!
//! Drawn across the top of the graph panel so the previous graph stays
//! visible underneath.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::theme::{ERROR_COLOR, MUTED_COLOR};

/// Rows taken by the banner, borders included.
const BANNER_HEIGHT: u16 = 4;

/// Renders `message` in a banner at the top of `area`.
pub fn render_error_banner(frame: &mut Frame, area: Rect, message: &str) {
    let banner = banner_area(area);
    if banner.height < 3 {
        return;
    }
    frame.render_widget(Clear, banner);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(ERROR_COLOR))
        .title(Span::styled(
            " Error ",
            Style::default().fg(ERROR_COLOR).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(
            Line::styled(" Esc to dismiss ", Style::default().fg(MUTED_COLOR)).right_aligned(),
        );

    let text = Paragraph::new(message)
        .style(Style::default().fg(ERROR_COLOR))
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(text, banner);
}

fn banner_area(area: Rect) -> Rect {
    Rect::new(
        area.x + 1,
        area.y + 1,
        area.width.saturating_sub(2),
        BANNER_HEIGHT.min(area.height.saturating_sub(2)),
    )
}
