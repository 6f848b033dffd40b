//! Test utilities for database and router setup.
//!
//! Provides an in-memory SQLite database with migrations applied, and a
//! fully wired application router for endpoint tests.

use std::sync::Arc;

use anyhow::Result;
use floorplan::config::AppConfig;
use floorplan::server::{AppState, create_app};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Bearer token accepted by the test application for staff endpoints.
pub const STAFF_TOKEN: &str = "test-staff-token";

/// Sets up an in-memory SQLite database with all migrations applied.
///
/// The pool is pinned to a single connection so the in-memory database is
/// shared across all queries in the test.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1);

    let db = Database::connect(opt).await?;
    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Builds the application router over a fresh in-memory database.
#[allow(dead_code)]
pub async fn test_app() -> Result<axum::Router> {
    let db = setup_test_db().await?;
    let config = AppConfig {
        staff_tokens: vec![STAFF_TOKEN.to_string()],
        ..AppConfig::default()
    };

    Ok(create_app(AppState::new(db, Arc::new(config))))
}
