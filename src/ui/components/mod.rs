//! Reusable UI components.
//!
//! - [`toast`] - Toast notification overlay for non-blocking messages
//! - [`banner`] - Dismissible error banner over the graph panel

pub mod banner;
pub mod toast;

pub use banner::render_error_banner;
pub use toast::render_toast;
