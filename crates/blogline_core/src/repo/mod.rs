//! Repository layer abstraction and SQLite persistence.
//!
//! # Responsibility
//! - Define the data-access contract consumed by menu workflows.
//! - Isolate SQLite query details from workflow orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`BlogNotFound`) in addition to
//!   DB transport errors.

pub mod blog_repo;
