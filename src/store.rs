//! Storage abstraction for table records.
//!
//! The lifecycle service talks to storage exclusively through [`TableStore`],
//! so the SeaORM-backed repository can be swapped for an in-memory fake in
//! tests. The store enforces nothing beyond data shape and the unique
//! constraint on `table_number`; invariants live in the service layer.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::table;
use crate::models::table::TableStatus;

/// Errors surfaced by a table store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database rejected an insert or rename that collides with an
    /// existing `table_number`. This is the backstop for the race the
    /// service-level pre-check cannot close.
    #[error("table number already exists")]
    DuplicateNumber,
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),
}

/// Fields required to create a table record.
#[derive(Debug, Clone)]
pub struct NewTable {
    pub table_number: String,
    pub capacity: i32,
    pub location: String,
    pub status: TableStatus,
    pub is_active: bool,
}

/// Partial update for a table record.
///
/// `None` means "leave untouched"; every supplied field is written as given.
/// Modeled as an explicit per-field `Option` so omission is unambiguous.
#[derive(Debug, Clone, Default)]
pub struct TablePatch {
    pub table_number: Option<String>,
    pub capacity: Option<i32>,
    pub location: Option<String>,
    pub status: Option<TableStatus>,
    pub is_active: Option<bool>,
}

/// Filter applied to `list` and `count` with identical semantics.
#[derive(Debug, Clone, Default)]
pub struct TableFilter {
    /// Exclude soft-deleted rows when set
    pub active_only: bool,
    /// Restrict to a single occupancy status
    pub status: Option<TableStatus>,
    /// Case-insensitive substring match against `table_number` OR `location`
    pub search: Option<String>,
}

/// Durable storage for table records.
///
/// All operations are atomic at the single-row level; rows are ordered by
/// `id` (insertion order) wherever ordering matters, giving stable
/// pagination.
#[async_trait]
pub trait TableStore: Send + Sync {
    async fn get(&self, id: i32) -> Result<Option<table::Model>, StoreError>;

    async fn get_by_number(&self, table_number: &str) -> Result<Option<table::Model>, StoreError>;

    /// Returns one page of rows matching `filter`, ordered by id.
    async fn list(
        &self,
        filter: &TableFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<table::Model>, StoreError>;

    /// Unpaginated total for the same filter, so callers can render "N of M".
    async fn count(&self, filter: &TableFilter) -> Result<u64, StoreError>;

    async fn insert(&self, new: NewTable) -> Result<table::Model, StoreError>;

    /// Applies only the fields set in `patch`; `None` if the id is unknown.
    async fn update(&self, id: i32, patch: TablePatch)
    -> Result<Option<table::Model>, StoreError>;

    /// Permanently removes the row, returning it; `None` if the id is unknown.
    async fn remove(&self, id: i32) -> Result<Option<table::Model>, StoreError>;

    /// Fixed-predicate view for booking flows: active + available, optionally
    /// with a capacity floor. No pagination.
    async fn list_available(
        &self,
        min_capacity: Option<i32>,
    ) -> Result<Vec<table::Model>, StoreError>;

    /// All active tables in the given status, no pagination.
    async fn list_by_status(&self, status: TableStatus) -> Result<Vec<table::Model>, StoreError>;
}
