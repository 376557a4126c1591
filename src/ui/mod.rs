//! UI rendering for the seer TUI.
//!
//! # Module Structure
//!
//! - `panels` - Filter pane, graph canvas and transaction list
//! - `components` - Toast and error banner overlays
//! - `layout` - Layout calculations
//! - `header` - Header bar and address input
//! - `footer` - Key binding hints
//! - `helpers` - Styled block helpers

pub mod components;
pub mod footer;
pub mod header;
pub mod helpers;
pub mod layout;
pub mod panels;

use ratatui::{Frame, layout::Rect};

use crate::state::App;

use layout::AppLayout;

// ============================================================================
// Main Render Entry Point
// ============================================================================

/// Renders the whole screen: header, address bar, the three panels, footer,
/// then the error banner and toast overlays.
pub fn render(app: &App, frame: &mut Frame) {
    let size = frame.area();
    let layout = AppLayout::new(size);

    header::render(frame, layout.header, app);
    header::render_address_bar(frame, layout.address, app);
    panels::filters::render(frame, layout.filters, app);
    panels::graph::render(frame, layout.graph, app);
    panels::transactions::render(frame, layout.details, app);
    footer::render(frame, layout.footer, app);

    if let Some(error) = app.session.error() {
        components::render_error_banner(frame, layout.graph, error);
    }
    if let Some(message) = app.ui.toast_message() {
        components::render_toast(frame, size, message);
    }
}

/// Drawable graph area for a terminal of size `area`.
#[must_use]
pub fn graph_canvas_area(area: Rect) -> Rect {
    AppLayout::new(area).graph_canvas()
}
