//! Platform-specific abstractions.
//!
//! - [`clipboard`] - Cross-platform clipboard access
//! - [`paths`] - Data directory and log file paths

pub mod clipboard;
pub mod paths;
