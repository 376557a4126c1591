//! Background workers feeding the session: name resolution and creator scans.
//!
//! Both report through an unbounded channel whose message type converts from
//! the worker's own event type, so the app loop receives them as ordinary
//! application messages.

pub mod creator_scan;
pub mod name_queue;

pub use creator_scan::{CreatorScanner, ScanConfig, ScanEvent, ScanReport};
pub use name_queue::{NameQueue, NameResolved};
