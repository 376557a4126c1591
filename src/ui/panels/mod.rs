//! Main content panels.
//!
//! - [`filters`] - Coin and time filters, per-coin rules, creator scan and legend
//! - [`graph`] - The bubble map canvas
//! - [`transactions`] - Transfers of the selected node

pub mod filters;
pub mod graph;
pub mod transactions;
