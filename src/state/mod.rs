//! Application state for the seer TUI.
//!
//! - [`Session`] - Graph session: transfers, filters, names, layout, selection
//! - [`UiState`] - Presentation concerns (focus, text editing, toasts, viewport)
//! - [`AppConfig`] - Persistent configuration with load/save capabilities
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                        App                           │
//! ├───────────────────┬─────────────────┬────────────────┤
//! │      Session      │     UiState     │    Services    │
//! │  - transfers      │  - focus        │  - transfers   │
//! │  - filters/rules  │  - text edits   │  - name queue  │
//! │  - positions      │  - viewport     │  - scanner     │
//! └───────────────────┴─────────────────┴────────────────┘
//! ```
//!
//! Background tasks report back through [`AppMessage`]s; the run loop drains
//! them into the session each iteration.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use crate::client::{EventSource, NameService, SuiRpcClient, TransferClient, TransferSource};
use crate::domain::{SeerError, Transfer};
use crate::graph::ClickTracker;
use crate::services::{CreatorScanner, NameQueue, NameResolved, ScanEvent};

// ============================================================================
// Module Declarations
// ============================================================================

mod app_lifecycle;

pub mod config;
pub mod platform;
pub mod session;
pub mod ui_state;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::AppConfig;
pub use session::{Action, Command, DetailRow, FetchMode, ScanStatus, Session};
pub use ui_state::{EditTarget, FilterRow, Focus, UiState};

// ============================================================================
// App Message Types
// ============================================================================

/// Messages sent from background tasks to the main loop.
#[derive(Debug, Clone)]
pub enum AppMessage {
    /// A transfer fetch finished.
    TransfersLoaded {
        address: String,
        mode: FetchMode,
        transfers: Vec<Transfer>,
    },
    /// A transfer fetch failed.
    TransfersFailed {
        address: String,
        mode: FetchMode,
        message: String,
    },
    /// One name lookup settled.
    Name(NameResolved),
    /// Creator scan progress or completion.
    Scan(ScanEvent),
}

impl From<NameResolved> for AppMessage {
    fn from(resolved: NameResolved) -> Self {
        Self::Name(resolved)
    }
}

impl From<ScanEvent> for AppMessage {
    fn from(event: ScanEvent) -> Self {
        Self::Scan(event)
    }
}

// ============================================================================
// Startup Options
// ============================================================================

/// Options passed on the command line.
#[derive(Debug, Clone, Default)]
pub struct StartupOptions {
    /// Address loaded as soon as the UI is up.
    pub address: Option<String>,
    /// Overrides the configured transfer proxy.
    pub transfers_url: Option<String>,
    /// Overrides the configured JSON-RPC endpoint.
    pub rpc_url: Option<String>,
}

impl StartupOptions {
    /// Applies URL overrides to `config`.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.transfers_url {
            config.transfers_api_url.clone_from(url);
        }
        if let Some(url) = &self.rpc_url {
            config.rpc_url.clone_from(url);
        }
    }
}

// ============================================================================
// Services
// ============================================================================

/// Network collaborators behind their traits.
#[derive(Clone)]
pub struct Services {
    pub transfers: Arc<dyn TransferSource>,
    pub names: Arc<dyn NameService>,
    pub events: Arc<dyn EventSource>,
}

impl Services {
    /// Builds the HTTP clients described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, SeerError> {
        let transfers = TransferClient::new(&config.transfers_api_url, config.request_timeout())?;
        let rpc = Arc::new(SuiRpcClient::new(
            &config.rpc_url,
            config.name_timeout(),
            config.request_timeout(),
        )?);
        info!(
            transfers = transfers.base_url(),
            rpc = rpc.url(),
            "network clients ready"
        );
        Ok(Self {
            transfers: Arc::new(transfers),
            names: rpc.clone(),
            events: rpc,
        })
    }
}

// ============================================================================
// Main App State
// ============================================================================

/// The main application state container.
pub struct App {
    /// Graph session, updated only through [`Action`]s.
    pub session: Session,

    /// UI state - focus, text editing, viewport, toasts.
    pub ui: UiState,

    pub config: AppConfig,

    /// Whether the application should exit.
    pub exit: bool,

    /// Single/double tap disambiguation on graph nodes.
    pub(crate) clicks: ClickTracker,

    // ========================================================================
    // Async Communication Channels
    // ========================================================================
    // Sends use `let _ = tx.send(...)`: the receiver only goes away on
    // shutdown.
    pub(crate) message_tx: mpsc::UnboundedSender<AppMessage>,
    pub(crate) message_rx: mpsc::UnboundedReceiver<AppMessage>,

    // ========================================================================
    // Services
    // ========================================================================
    pub(crate) transfers: Arc<dyn TransferSource>,
    pub(crate) names: NameQueue<AppMessage>,
    pub(crate) scanner: CreatorScanner,

    pub(crate) startup_options: Option<StartupOptions>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("root", &self.session.root())
            .field("ui", &self.ui)
            .field("exit", &self.exit)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Implementation Modules
// ============================================================================

// Session dispatch, side effects, message processing
mod app_messages;

// Key and mouse input, command execution
mod app_commands;

// Clipboard, browser and filter field actions
mod app_actions;

// ============================================================================
// Tests
// ============================================================================
