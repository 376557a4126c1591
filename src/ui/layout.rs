//! Layout calculations for the seer TUI.

use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};

// ============================================================================
// Constants
// ============================================================================

/// Height of the header area in terminal rows.
pub const HEADER_HEIGHT: u16 = 3;

/// Height of the address bar.
pub const ADDRESS_BAR_HEIGHT: u16 = 3;

/// Height of the footer area in terminal rows.
pub const FOOTER_HEIGHT: u16 = 1;

/// Width of the filter pane.
pub const FILTER_PANE_WIDTH: u16 = 34;

/// Width of the transaction pane.
pub const DETAIL_PANE_WIDTH: u16 = 48;

// ============================================================================
// Layout Structs
// ============================================================================

/// Main application layout areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub header: Rect,
    pub address: Rect,
    /// Filters, rules, scan results and legend.
    pub filters: Rect,
    /// Graph panel including its border.
    pub graph: Rect,
    /// Transactions of the selected node.
    pub details: Rect,
    pub footer: Rect,
}

impl AppLayout {
    /// Splits the terminal area. The graph takes whatever the side panes leave.
    #[must_use]
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Length(ADDRESS_BAR_HEIGHT),
                Constraint::Min(3),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(FILTER_PANE_WIDTH),
                Constraint::Fill(1),
                Constraint::Length(DETAIL_PANE_WIDTH),
            ])
            .split(rows[2]);

        Self {
            header: rows[0],
            address: rows[1],
            filters: columns[0],
            graph: columns[1],
            details: columns[2],
            footer: rows[3],
        }
    }

    /// Drawable area of the graph canvas (inside its border).
    #[must_use]
    pub fn graph_canvas(&self) -> Rect {
        self.graph.inner(Margin::new(1, 1))
    }
}


// ============================================================================
// Tests
// ============================================================================
