//! UI presentation state: focus, text editing, list cursors and toasts.
//!
//! Nothing here touches the graph session; the app reads it to decide how to
//! interpret input and the renderer reads it to draw cursors and overlays.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use ratatui::layout::Rect;

use crate::graph::Viewport;

// ============================================================================
// Constants
// ============================================================================

/// Ticks (100ms each) a toast stays on screen.
pub const TOAST_TICKS: u8 = 25;

/// Display and input format of the time window bounds (UTC).
pub const TIME_INPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

// ============================================================================
// Focus
// ============================================================================

/// Focused panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Graph,
    Filters,
    Transactions,
}

impl Focus {
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Graph => Self::Filters,
            Self::Filters => Self::Transactions,
            Self::Transactions => Self::Graph,
        }
    }
}

// ============================================================================
// Filter Rows
// ============================================================================

/// A row of the filter pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRow {
    /// Global coin filter.
    Coin,
    /// Window start.
    Start,
    /// Window end.
    End,
    /// Draft rule at this index.
    Rule(usize),
}

impl FilterRow {
    /// Rows in display order for `draft_count` draft rules.
    #[must_use]
    pub fn all(draft_count: usize) -> Vec<Self> {
        [Self::Coin, Self::Start, Self::End]
            .into_iter()
            .chain((0..draft_count).map(Self::Rule))
            .collect()
    }
}

/// What the text buffer is being typed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Address,
    Start,
    End,
    RuleMin(usize),
}

// ============================================================================
// UiState
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub focus: Focus,
    /// Contents of the address bar.
    pub address_input: String,
    /// Active text edit, if any.
    pub editing: Option<EditTarget>,
    /// Buffer for filter field edits.
    pub field_buffer: String,
    /// Cursor in the filter pane.
    pub filter_row: usize,
    /// Cursor in the transaction list.
    pub detail_index: usize,
    /// Toast message and remaining ticks.
    pub toast: Option<(String, u8)>,
    pub viewport: Viewport,
    /// Inner area of the graph canvas at the last draw, for hit-testing.
    pub graph_area: Rect,
}

impl UiState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cycle_focus(&mut self) {
        self.focus = self.focus.next();
    }

    // ========================================================================
    // Text Editing
    // ========================================================================

    /// Starts editing `target`. Filter fields start from `initial`; the
    /// address bar keeps its own contents.
    pub fn begin_edit(&mut self, target: EditTarget, initial: impl Into<String>) {
        if target != EditTarget::Address {
            self.field_buffer = initial.into();
        }
        self.editing = Some(target);
    }


    fn buffer_mut(&mut self) -> Option<&mut String> {
        match self.editing? {
            EditTarget::Address => Some(&mut self.address_input),
            _ => Some(&mut self.field_buffer),
        }
    }

    pub fn type_char(&mut self, c: char) {
        if let Some(buffer) = self.buffer_mut() {
            buffer.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(buffer) = self.buffer_mut() {
            buffer.pop();
        }
    }

    /// Ends the edit and returns what was typed, and where.
    pub fn finish_edit(&mut self) -> Option<(EditTarget, String)> {
        let target = self.editing.take()?;
        let text = match target {
            EditTarget::Address => self.address_input.clone(),
            _ => std::mem::take(&mut self.field_buffer),
        };
        Some((target, text))
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.field_buffer.clear();
    }

    // ========================================================================
    // Cursors
    // ========================================================================

    /// Filter row under the cursor, clamped to the rows that exist.
    #[must_use]
    pub fn current_filter_row(&self, draft_count: usize) -> FilterRow {
        let rows = FilterRow::all(draft_count);
        let index = self.filter_row.min(rows.len() - 1);
        rows[index]
    }

    pub fn move_filter_row(&mut self, down: bool, draft_count: usize) {
        let last = FilterRow::all(draft_count).len() - 1;
        self.filter_row = if down {
            (self.filter_row + 1).min(last)
        } else {
            self.filter_row.min(last).saturating_sub(1)
        };
    }

    pub fn move_detail(&mut self, down: bool, row_count: usize) {
        if row_count == 0 {
            self.detail_index = 0;
            return;
        }
        self.detail_index = if down {
            (self.detail_index + 1).min(row_count - 1)
        } else {
            self.detail_index.min(row_count - 1).saturating_sub(1)
        };
    }

    // ========================================================================
    // Toasts
    // ========================================================================

    pub fn show_toast(&mut self, message: impl Into<String>, ticks: u8) {
        self.toast = Some((message.into(), ticks));
    }

    /// Decrements the toast countdown; returns `true` if it was removed.
    pub fn tick_toast(&mut self) -> bool {
        if let Some((_, ref mut ticks)) = self.toast {
            *ticks = ticks.saturating_sub(1);
            if *ticks == 0 {
                self.toast = None;
                return true;
            }
        }
        false
    }

    #[must_use]
    pub fn toast_message(&self) -> Option<&str> {
        self.toast.as_ref().map(|(msg, _)| msg.as_str())
    }
}

// ============================================================================
// Option Cycling and Time Input
// ============================================================================

/// Steps through `[None, options...]` from `current`.
///
/// An unknown `current` is treated as `None`.
#[must_use]
pub fn cycle_option(options: &[String], current: Option<&str>, forward: bool) -> Option<String> {
    let slots = options.len() + 1;
    let position = current
        .and_then(|c| options.iter().position(|o| o == c))
        .map_or(0, |i| i + 1);
    let next = if forward {
        (position + 1) % slots
    } else {
        (position + slots - 1) % slots
    };
    next.checked_sub(1).map(|i| options[i].clone())
}

/// Formats a window bound for editing; empty for an open bound.
#[must_use]
pub fn format_time_input(timestamp_ms: Option<i64>) -> String {
    timestamp_ms
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map(|dt| dt.format(TIME_INPUT_FORMAT).to_string())
        .unwrap_or_default()
}

/// Parses a window bound typed by the user.
///
/// Accepts `YYYY-MM-DD HH:MM[:SS]` or `YYYY-MM-DD` (UTC). Blank input clears
/// the bound.
///
/// # Errors
///
/// Returns a message describing the expected format.
pub fn parse_time_input(input: &str) -> Result<Option<i64>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    let parsed = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(input, TIME_INPUT_FORMAT))
        .or_else(|_| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
        })
        .map_err(|_| format!("Invalid time '{input}', expected YYYY-MM-DD HH:MM"))?;
    Ok(Some(parsed.and_utc().timestamp_millis()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_focus_cycles_through_panels() {
        let mut ui = UiState::new();
        assert_eq!(ui.focus, Focus::Graph);
        ui.cycle_focus();
        assert_eq!(ui.focus, Focus::Filters);
        ui.cycle_focus();
        assert_eq!(ui.focus, Focus::Transactions);
        ui.cycle_focus();
        assert_eq!(ui.focus, Focus::Graph);
    }

    #[test]
    fn test_address_edit_keeps_input() {
        let mut ui = UiState::new();
        ui.address_input = "0xa".into();
        ui.begin_edit(EditTarget::Address, "ignored");
        ui.type_char('b');
        assert_eq!(
            ui.finish_edit(),
            Some((EditTarget::Address, "0xab".to_string()))
        );
        assert_eq!(ui.address_input, "0xab");
        assert_eq!(ui.editing, None);
    }

    #[test]
    fn test_field_edit_uses_separate_buffer() {
        let mut ui = UiState::new();
        ui.address_input = "0xa".into();
        ui.begin_edit(EditTarget::RuleMin(1), "10");
        ui.backspace();
        ui.type_char('5');
        assert_eq!(
            ui.finish_edit(),
            Some((EditTarget::RuleMin(1), "15".to_string()))
        );
        assert_eq!(ui.address_input, "0xa");
        assert!(ui.field_buffer.is_empty());
    }

    #[test]
    fn test_typing_without_edit_is_ignored() {
        let mut ui = UiState::new();
        ui.type_char('x');
        ui.backspace();
        assert!(ui.address_input.is_empty());
        assert_eq!(ui.finish_edit(), None);
    }

    #[test]
    fn test_filter_row_cursor_clamps() {
        let mut ui = UiState::new();
        assert_eq!(ui.current_filter_row(0), FilterRow::Coin);
        for _ in 0..5 {
            ui.move_filter_row(true, 1);
        }
        assert_eq!(ui.current_filter_row(1), FilterRow::Rule(0));
        // rule removed underneath the cursor
        assert_eq!(ui.current_filter_row(0), FilterRow::End);
        ui.move_filter_row(false, 0);
        assert_eq!(ui.current_filter_row(0), FilterRow::Start);
    }

    #[test]
    fn test_detail_cursor_clamps() {
        let mut ui = UiState::new();
        ui.move_detail(true, 2);
        ui.move_detail(true, 2);
        assert_eq!(ui.detail_index, 1);
        ui.move_detail(false, 2);
        assert_eq!(ui.detail_index, 0);
        ui.move_detail(true, 0);
        assert_eq!(ui.detail_index, 0);
    }

    #[test]
    fn test_toast_expires() {
        let mut ui = UiState::new();
        ui.show_toast("copied", 2);
        assert!(!ui.tick_toast());
        assert_eq!(ui.toast_message(), Some("copied"));
        assert!(ui.tick_toast());
        assert_eq!(ui.toast_message(), None);
    }

    #[rstest]
    #[case(None, true, Some("sui"))]
    #[case(Some("sui"), true, Some("usdc"))]
    #[case(Some("usdc"), true, None)]
    #[case(None, false, Some("usdc"))]
    #[case(Some("sui"), false, None)]
    #[case(Some("gone"), true, Some("sui"))]
    fn test_cycle_option(
        #[case] current: Option<&str>,
        #[case] forward: bool,
        #[case] expected: Option<&str>,
    ) {
        let options = vec!["sui".to_string(), "usdc".to_string()];
        assert_eq!(
            cycle_option(&options, current, forward).as_deref(),
            expected
        );
    }

    #[test]
    fn test_cycle_option_without_options() {
        assert_eq!(cycle_option(&[], Some("sui"), true), None);
    }

    #[rstest]
    #[case("", None)]
    #[case("  ", None)]
    #[case("1970-01-01 00:01", Some(60_000))]
    #[case("1970-01-01 00:00:05", Some(5_000))]
    #[case("1970-01-02", Some(86_400_000))]
    fn test_parse_time_input(#[case] input: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_time_input(input), Ok(expected));
    }

    #[test]
    fn test_parse_time_input_rejects_garbage() {
        let err = parse_time_input("yesterday").unwrap_err();
        assert!(err.contains("YYYY-MM-DD HH:MM"));
    }

    #[test]
    fn test_format_time_input() {
        assert_eq!(format_time_input(None), "");
        assert_eq!(format_time_input(Some(60_000)), "1970-01-01 00:01");
        let typed = format_time_input(Some(1_700_000_000_000));
        assert_eq!(parse_time_input(&typed), Ok(Some(1_699_999_980_000)));
    }
}
