//! Blog and post domain model.
//!
//! # Responsibility
//! - Define the records persisted by the repository layer.
//! - Define read models returned by listing queries.
//!
//! # Invariants
//! - Identifiers are assigned by storage, never by callers.
//! - Every post references exactly one blog.

pub mod blog;
pub mod post;
