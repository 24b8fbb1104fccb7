//! Page-level state and derivations that sit above the services.
//!
//! # Responsibility
//! - Filter already-fetched collections for the list pages.
//! - Hold page collections as replace-on-write snapshots.
//! - Derive finance page totals.

pub mod filter;
pub mod finance;
pub mod list_state;
