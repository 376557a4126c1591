//! Clipboard access for copying addresses from the detail panel.
//!
//! On Linux the external tools `wl-copy`, `xclip` and `xsel` are tried first
//! since they keep the content after the application exits; `arboard` is the
//! fallback there and the only backend elsewhere.

use std::fmt;

// ============================================================================
// Error Type
// ============================================================================

/// Error type for clipboard operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// Clipboard is not available on this system.
    NotAvailable,
    /// Failed to copy text to clipboard.
    CopyFailed(String),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAvailable => write!(f, "Clipboard not available"),
            Self::CopyFailed(msg) => write!(f, "Failed to copy: {msg}"),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// Result type for clipboard operations.
pub type ClipboardResult<T> = Result<T, ClipboardError>;

// ============================================================================
// Clipboard Manager
// ============================================================================

/// Linux tools tried in order, with their arguments.
#[cfg(target_os = "linux")]
const EXTERNAL_TOOLS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

#[derive(Debug)]
pub struct ClipboardManager {
    prefer_external_tools: bool,
}

impl Default for ClipboardManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            prefer_external_tools: true,
        }
    }


    /// Copies text to the clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if no backend is available or the copy fails.
    pub fn copy_text(&self, text: &str) -> ClipboardResult<()> {
        #[cfg(target_os = "linux")]
        if self.prefer_external_tools
            && EXTERNAL_TOOLS
                .iter()
                .any(|(tool, args)| Self::try_tool(tool, args, text))
        {
            return Ok(());
        }

        let mut clipboard = arboard::Clipboard::new().map_err(|_| ClipboardError::NotAvailable)?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::CopyFailed(e.to_string()))
    }

    #[cfg(target_os = "linux")]
    fn try_tool(tool: &str, args: &[&str], text: &str) -> bool {
        use std::io::Write;
        use std::process::{Command, Stdio};

        let Ok(mut child) = Command::new(tool)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        else {
            return false;
        };

        let Some(mut stdin) = child.stdin.take() else {
            return false;
        };
        if stdin.write_all(text.as_bytes()).is_err() {
            return false;
        }
        drop(stdin);

        child.wait().map(|s| s.success()).unwrap_or(false)
    }
}

/// Copies text with the default clipboard manager.
///
/// # Errors
///
/// Returns an error if the clipboard is not available or the copy fails.
pub fn copy_text(text: &str) -> ClipboardResult<()> {
    ClipboardManager::new().copy_text(text)
}

// ============================================================================
// Tests
// ============================================================================
