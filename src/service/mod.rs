//! # Service Layer
//!
//! Lifecycle services that enforce domain invariants on top of the
//! repository layer.

pub mod tables;

pub use tables::{TableError, TableService};
