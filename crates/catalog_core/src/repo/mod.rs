//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for the catalog.
//! - Isolate SQLite query details from unit-of-work orchestration.
//!
//! # Invariants
//! - Write paths enforce draft validation before SQL mutations.
//! - Association state is stored once (join table / foreign key); both
//!   direction views are derived by lookup queries.

pub mod catalog_repo;
pub mod mapping;
