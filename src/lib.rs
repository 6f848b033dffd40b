//! # Floorplan API Library
//!
//! This library provides the core functionality for the Floorplan service:
//! a lifecycle manager for restaurant tables over a pluggable store, with
//! handlers, models, and server configuration.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod server;
pub mod service;
pub mod store;
pub mod telemetry;
pub use migration;
