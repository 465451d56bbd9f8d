//! Read-side use-case services.
//!
//! # Responsibility
//! - Orchestrate repository lookups into association views for callers.
//! - Keep entry points decoupled from SQL details.

pub mod catalog_service;
