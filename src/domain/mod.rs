//! Domain types for the seer wallet explorer.
//!
//! # Module Organization
//!
//! - [`error`] - Custom error types for client operations
//! - [`coin`] - Coin metadata (symbols, decimals, human amounts)
//! - [`address`] - Address display helpers
//! - [`transfer`] - Transfer records and the merged transfer set
//! - [`name`] - Name service cache and response parsing
//! - [`creator`] - Coin creation events and the creator registry

// ============================================================================
// Module Declarations
// ============================================================================

pub mod address;
pub mod coin;
pub mod creator;
pub mod error;
pub mod name;
pub mod transfer;

// ============================================================================
// Re-exports
// ============================================================================

pub use address::normalize_address;
pub use creator::{CreatedCoin, CreatorRegistry};
pub use error::SeerError;
pub use name::NameCache;
pub use transfer::{Direction, Transfer};
