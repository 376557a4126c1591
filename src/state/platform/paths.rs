//! Platform data directory and log file location.
//!
//! | Platform | Data Dir |
//! |----------|----------|
//! | Linux | `~/.local/share/seer` |
//! | macOS | `~/Library/Application Support/seer` |
//! | Windows | `%LOCALAPPDATA%/seer` |

use color_eyre::Result;
use std::fs;
use std::path::PathBuf;

// ============================================================================
// Constants
// ============================================================================

/// Application name used for directory naming.
pub const APP_NAME: &str = "seer";

/// Default log file name.
pub const LOG_FILE_NAME: &str = "seer.log";

// ============================================================================
// Paths
// ============================================================================

/// Returns the data directory, creating it if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be determined or created.
pub fn data_dir() -> Result<PathBuf> {
    let mut path = dirs::data_local_dir()
        .or_else(dirs::data_dir)
        .ok_or_else(|| color_eyre::eyre::eyre!("Could not find data directory"))?;
    path.push(APP_NAME);
    fs::create_dir_all(&path)?;
    Ok(path)
}

/// Returns the default log file path.
///
/// # Errors
///
/// Returns an error if the data directory cannot be determined or created.
pub fn log_file() -> Result<PathBuf> {
    let mut path = data_dir()?;
    path.push(LOG_FILE_NAME);
    Ok(path)
}
