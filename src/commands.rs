//! Key event to command mapping.
//!
//! Key handling is split in two steps: [`KeyMapper::map_key`] turns a key
//! event into an [`AppCommand`] for the active [`InputContext`], and the app
//! executes the command. Keeping the mapping pure makes bindings testable
//! without a terminal.
//!
//! ```ignore
//! let context = app.input_context();
//! match map_key(key_event, &context) {
//!     AppCommand::Quit => app.exit = true,
//!     command => app.execute_command(command),
//! }
//! ```

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// ============================================================================
// Input Context
// ============================================================================

/// Which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    /// Graph canvas focused: pan, zoom, expand.
    Graph,
    /// Filter pane focused: navigate rows, cycle coins, manage rules.
    Filters,
    /// Transaction list of the selected node focused.
    Transactions,
    /// Typing into the address bar.
    AddressInput,
    /// Typing into a filter field (time bound or rule minimum).
    FieldEdit,
}


// ============================================================================
// App Commands
// ============================================================================

/// Everything a key press can ask the application to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    // === Application Control ===
    Quit,
    /// Dismiss the error banner, or clear the selection when there is none.
    Dismiss,
    /// Reload the current root address.
    Reload,

    // === Focus ===
    CycleFocus,
    /// Focus the address bar for typing.
    EditAddress,

    // === Text Input ===
    TypeChar(char),
    Backspace,
    /// Confirm the text being edited, or start editing the focused row.
    Submit,
    /// Leave text editing without applying it.
    CancelEdit,

    // === Lists ===
    MoveUp,
    MoveDown,
    /// Previous option of the focused filter row.
    PrevOption,
    /// Next option of the focused filter row.
    NextOption,

    // === Graph ===
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
    ZoomIn,
    ZoomOut,
    FitView,
    /// Expand the selected node.
    ExpandSelected,

    // === Creator Scan ===
    ScanCreators,
    ClearScan,

    // === Rules ===
    AddRule,
    RemoveRule,
    ApplyRules,

    // === Detail Rows ===
    CopyAddress,
    OpenExplorer,

    Noop,
}


// ============================================================================
// Key Mapper
// ============================================================================

/// Maps key events to application commands based on the current context.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyMapper;

impl KeyMapper {
    /// Maps a key event to a command. Pure: no side effects.
    #[must_use]
    pub fn map_key(key: KeyEvent, context: &InputContext) -> AppCommand {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return AppCommand::Quit;
        }

        match context {
            InputContext::AddressInput | InputContext::FieldEdit => Self::map_text_keys(key),
            InputContext::Graph => {
                Self::map_graph_keys(key).unwrap_or_else(|| Self::map_global_keys(key))
            }
            InputContext::Filters => {
                Self::map_filter_keys(key).unwrap_or_else(|| Self::map_global_keys(key))
            }
            InputContext::Transactions => {
                Self::map_transaction_keys(key).unwrap_or_else(|| Self::map_global_keys(key))
            }
        }
    }

    /// Bindings shared by every non-text context.
    fn map_global_keys(key: KeyEvent) -> AppCommand {
        match key.code {
            KeyCode::Char('q') => AppCommand::Quit,
            KeyCode::Esc => AppCommand::Dismiss,
            KeyCode::Tab | KeyCode::BackTab => AppCommand::CycleFocus,
            KeyCode::Char('/') => AppCommand::EditAddress,
            KeyCode::Char('r') => AppCommand::Reload,
            KeyCode::Char('s') => AppCommand::ScanCreators,
            KeyCode::Char('x') => AppCommand::ClearScan,
            _ => AppCommand::Noop,
        }
    }

    fn map_graph_keys(key: KeyEvent) -> Option<AppCommand> {
        let command = match key.code {
            KeyCode::Left | KeyCode::Char('h') => AppCommand::PanLeft,
            KeyCode::Right | KeyCode::Char('l') => AppCommand::PanRight,
            KeyCode::Up | KeyCode::Char('k') => AppCommand::PanUp,
            KeyCode::Down | KeyCode::Char('j') => AppCommand::PanDown,
            KeyCode::Char('+' | '=') => AppCommand::ZoomIn,
            KeyCode::Char('-') => AppCommand::ZoomOut,
            KeyCode::Char('0' | 'f') => AppCommand::FitView,
            KeyCode::Enter | KeyCode::Char('e') => AppCommand::ExpandSelected,
            _ => return None,
        };
        Some(command)
    }

    fn map_filter_keys(key: KeyEvent) -> Option<AppCommand> {
        let command = match key.code {
            KeyCode::Up | KeyCode::Char('k') => AppCommand::MoveUp,
            KeyCode::Down | KeyCode::Char('j') => AppCommand::MoveDown,
            KeyCode::Left => AppCommand::PrevOption,
            KeyCode::Right => AppCommand::NextOption,
            KeyCode::Enter => AppCommand::Submit,
            KeyCode::Char('a') => AppCommand::AddRule,
            KeyCode::Char('d') | KeyCode::Delete => AppCommand::RemoveRule,
            KeyCode::Char('p') => AppCommand::ApplyRules,
            _ => return None,
        };
        Some(command)
    }

    fn map_transaction_keys(key: KeyEvent) -> Option<AppCommand> {
        let command = match key.code {
            KeyCode::Up | KeyCode::Char('k') => AppCommand::MoveUp,
            KeyCode::Down | KeyCode::Char('j') => AppCommand::MoveDown,
            KeyCode::Char('y') => AppCommand::CopyAddress,
            KeyCode::Char('o') | KeyCode::Enter => AppCommand::OpenExplorer,
            _ => return None,
        };
        Some(command)
    }

    fn map_text_keys(key: KeyEvent) -> AppCommand {
        match key.code {
            KeyCode::Esc => AppCommand::CancelEdit,
            KeyCode::Enter => AppCommand::Submit,
            KeyCode::Backspace => AppCommand::Backspace,
            KeyCode::Char(c) => AppCommand::TypeChar(c),
            _ => AppCommand::Noop,
        }
    }
}

/// Shorthand for [`KeyMapper::map_key`].
#[must_use]
pub fn map_key(key: KeyEvent, context: &InputContext) -> AppCommand {
    KeyMapper::map_key(key, context)
}

// ============================================================================
// Tests
// ============================================================================
