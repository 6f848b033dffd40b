//! # Repository Layer
//!
//! This module contains repository implementations that encapsulate SeaORM
//! operations for database entities.

pub mod table;

pub use table::TableRepository;
