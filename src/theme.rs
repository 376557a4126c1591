//! Theme and styling constants for the seer TUI.

use ratatui::style::{Color, Modifier, Style};

use crate::graph::{EdgeKind, NodeRole};

// ============================================================================
// Color Constants
// ============================================================================

/// Primary accent color - focused elements and highlights.
pub const PRIMARY_COLOR: Color = Color::Cyan;

/// Success indicator color.
pub const SUCCESS_COLOR: Color = Color::Green;

/// Warning indicator color.
pub const WARNING_COLOR: Color = Color::Yellow;

/// Error indicator color.
pub const ERROR_COLOR: Color = Color::Red;

/// Muted text color.
pub const MUTED_COLOR: Color = Color::Gray;

// ============================================================================
// Graph Palette
// ============================================================================

/// Root node fill and default edge color.
pub const ROOT_COLOR: Color = Color::Rgb(0xc0, 0x2b, 0x2b);

/// Edges flowing into the root or an expanded anchor.
pub const RECEIVE_COLOR: Color = Color::Rgb(0x00, 0xc8, 0xff);

/// Nodes with a resolved name.
pub const NAMED_COLOR: Color = Color::Rgb(0xff, 0xd8, 0x4d);

/// Plain addresses.
pub const DEFAULT_NODE_COLOR: Color = Color::Rgb(0x88, 0x88, 0x88);

/// Coin creators.
pub const CREATOR_COLOR: Color = Color::Rgb(0xa4, 0x61, 0xff);

/// Fill color of a node role.
#[must_use]
pub const fn node_color(role: NodeRole) -> Color {
    match role {
        NodeRole::Root => ROOT_COLOR,
        NodeRole::Creator => CREATOR_COLOR,
        NodeRole::Named => NAMED_COLOR,
        NodeRole::Default => DEFAULT_NODE_COLOR,
    }
}

/// Line color of an edge.
#[must_use]
pub const fn edge_color(kind: EdgeKind) -> Color {
    match kind {
        EdgeKind::Receive => RECEIVE_COLOR,
        EdgeKind::Flow => ROOT_COLOR,
    }
}

// ============================================================================
// Style Constants
// ============================================================================

/// Default border style for unfocused elements.
pub const BORDER_STYLE: Style = Style::new().fg(Color::DarkGray);

/// Border style for focused/active elements.
pub const FOCUSED_BORDER_STYLE: Style = Style::new().fg(PRIMARY_COLOR);

/// Title style for focused/active elements.
pub const FOCUSED_TITLE_STYLE: Style = Style::new().fg(PRIMARY_COLOR).add_modifier(Modifier::BOLD);

/// Style for selected items in lists.
pub const SELECTED_STYLE: Style = Style::new().bg(Color::DarkGray);

/// Style for the row under the cursor of a focused list.
pub const HIGHLIGHT_STYLE: Style = Style::new()
    .bg(Color::DarkGray)
    .add_modifier(Modifier::BOLD);
