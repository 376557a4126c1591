//! Footer bar with key hints for the active input context.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    widgets::Paragraph,
};

use crate::commands::InputContext;
use crate::state::App;
use crate::theme::MUTED_COLOR;

// ============================================================================
// Footer Rendering
// ============================================================================

/// Renders the key hints for whatever currently receives input.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let footer = Paragraph::new(hints(app.input_context()))
        .style(Style::default().fg(MUTED_COLOR))
        .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

#[must_use]
pub const fn hints(context: InputContext) -> &'static str {
    match context {
        InputContext::Graph => {
            "q:Quit  /:Address  Tab:Focus  hjkl:Pan  +/-:Zoom  0:Fit  e:Expand  s:Scan  r:Reload"
        }
        InputContext::Filters => {
            "q:Quit  Tab:Focus  ↑↓:Row  ←→:Coin  Enter:Edit  a:Add rule  d:Remove  p:Apply"
        }
        InputContext::Transactions => "q:Quit  Tab:Focus  ↑↓:Select  y:Copy address  o:Open in explorer",
        InputContext::AddressInput => "Enter:Load  Esc:Cancel",
        InputContext::FieldEdit => "Enter:Save  Esc:Cancel  format YYYY-MM-DD HH:MM",
    }
}

// ============================================================================
// Tests
// ============================================================================
