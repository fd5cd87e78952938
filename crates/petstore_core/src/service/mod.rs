//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Enforce scope, conflict, and id-resolution rules above persistence.
//!
//! # Invariants
//! - Services never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

pub mod customer_service;
pub mod employee_service;
pub mod store_service;

/// Outcome of resolving the optional id carried by a save payload.
///
/// A missing id always means "create". A supplied id must match an existing
/// record; a supplied-but-unknown id surfaces as a not-found error, never
/// as a silent create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<R> {
    /// No id supplied: the payload describes a new record.
    New,
    /// Id supplied and present: carries the currently persisted record.
    Existing(R),
}
