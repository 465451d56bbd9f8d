//! Unit-of-work batch assembly and execution.
//!
//! # Responsibility
//! - Collect entity drafts and association wiring before any persistence.
//! - Execute a whole batch inside one transaction, all-or-nothing.
//!
//! # Invariants
//! - Entities are saved in the order they were declared.
//! - Wiring is recorded set-like; repeated pairs collapse to one record.
//! - A failed batch leaves no durable rows behind.

pub mod batch;
pub mod runner;

pub use batch::{CatalogBatch, CategoryHandle, ProductHandle};
pub use runner::{run_batch, BatchOutcome, UowError};
