//! Application configuration with persistence.
//!
//! This module provides the [`AppConfig`] structure for managing application
//! settings with automatic load/save to disk.
//!
//! # Configuration File Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/seer/config.json`
//! - macOS: `~/Library/Application Support/seer/config.json`
//! - Windows: `%APPDATA%/seer/config.json`
//!
//! # Example
//!
//! ```ignore
//! use crate::state::AppConfig;
//!
//! // Load existing config or use defaults
//! let mut config = AppConfig::load();
//! config.rpc_url = "http://127.0.0.1:9000".into();
//! config.save()?;
//! ```

use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::client::rpc::DEFAULT_RPC_URL;
use crate::services::ScanConfig;
use crate::services::name_queue::DEFAULT_NAME_DELAY;

// ============================================================================
// Constants
// ============================================================================

/// Application name used for configuration directory.
const APP_NAME: &str = "seer";

/// Configuration file name.
const CONFIG_FILE: &str = "config.json";

/// Default transfer proxy base (serves `/sent` and `/received`).
pub const DEFAULT_TRANSFERS_URL: &str = "http://localhost:3000/api/insidex";

/// Default block explorer transaction prefix.
pub const DEFAULT_EXPLORER_URL: &str = "https://suivision.xyz/txblock/";

// ============================================================================
// AppConfig
// ============================================================================

/// Application configuration structure for persistence.
///
/// Missing fields fall back to their defaults, so partial files stay valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Transfer proxy base URL.
    pub transfers_api_url: String,
    /// JSON-RPC endpoint used for name lookups and event queries.
    pub rpc_url: String,
    /// Prefix prepended to a digest to open it in a block explorer.
    pub explorer_url: String,
    /// Timeout for transfer fetches and event queries.
    pub request_timeout_secs: u64,
    /// Timeout for a single name lookup.
    pub name_timeout_secs: u64,
    /// Pause between two name lookups.
    pub name_delay_ms: u64,
    /// Creator scan worker count.
    pub scan_concurrency: usize,
    /// Event pages fetched per scanned address.
    pub scan_max_pages: usize,
    /// Events per page.
    pub scan_page_size: usize,
    /// Double-click window on graph nodes.
    pub double_click_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            transfers_api_url: DEFAULT_TRANSFERS_URL.to_string(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            request_timeout_secs: 15,
            name_timeout_secs: 12,
            name_delay_ms: DEFAULT_NAME_DELAY.as_millis() as u64,
            scan_concurrency: 4,
            scan_max_pages: 8,
            scan_page_size: 50,
            double_click_ms: 280,
        }
    }
}

impl AppConfig {
    /// Returns the path to the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration directory cannot be determined
    /// or created.
    pub fn config_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().ok_or_else(|| {
            color_eyre::eyre::eyre!(
                "Could not determine config directory. Expected XDG_CONFIG_HOME or ~/.config on Linux, ~/Library/Application Support on macOS, %APPDATA% on Windows"
            )
        })?;
        path.push(APP_NAME);
        fs::create_dir_all(&path)?;
        path.push(CONFIG_FILE);
        Ok(path)
    }

    /// Loads the configuration from disk.
    ///
    /// If the configuration file doesn't exist or cannot be parsed,
    /// returns the default configuration.
    #[must_use]
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(err) => {
                warn!("config load failed, using defaults: {err}");
                Self::default()
            }
        }
    }

    /// Attempts to load the configuration from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be determined, the file cannot be
    /// read, or the JSON content cannot be parsed.
    pub fn try_load() -> Result<Self> {
        let path = Self::config_path()?;
        let content = fs::read_to_string(&path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Saves the configuration to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be determined, the configuration
    /// cannot be serialized, or the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    #[must_use]
    pub fn name_timeout(&self) -> Duration {
        Duration::from_secs(self.name_timeout_secs.max(1))
    }

    #[must_use]
    pub fn name_delay(&self) -> Duration {
        Duration::from_millis(self.name_delay_ms)
    }

    #[must_use]
    pub fn double_click(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }

    /// Worker pool settings for creator scans.
    #[must_use]
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            concurrency: self.scan_concurrency.max(1),
            max_pages: self.scan_max_pages.max(1),
            page_size: self.scan_page_size.max(1),
            ..ScanConfig::default()
        }
    }

    /// Explorer link for a transaction digest.
    #[must_use]
    pub fn explorer_link(&self, digest: &str) -> String {
        format!("{}{}", self.explorer_url, digest)
    }
}

// ============================================================================
// Tests
// ============================================================================
