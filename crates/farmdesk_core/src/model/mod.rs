//! Typed domain model for farm records.
//!
//! # Responsibility
//! - Define one explicit struct per entity plus its create/patch inputs.
//! - Own field-level input validation rules.
//!
//! # Invariants
//! - Every persisted entity is identified by a store-assigned `RecordId`.
//! - Optional values are `Option<T>`; patches use `Option<Option<T>>` for
//!   clearable columns so "leave unchanged" and "clear" stay distinct.
//! - No referential integrity: field references may dangle.

pub mod dates;
pub mod field;
pub mod finance;
pub mod inventory;
pub mod task;
pub mod validation;
pub mod weather;

use crate::store::RecordId;

/// Entities that carry a store-assigned identity.
pub trait Identified {
    fn id(&self) -> RecordId;
}
