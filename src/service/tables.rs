//! Table lifecycle service
//!
//! Single authority for state changes to table records. Enforces the
//! uniqueness invariant on `table_number` and the deletion guard for tables
//! in active use, then delegates storage to a [`TableStore`]. Status writes
//! are deliberately unrestricted: the callers (staff UI, booking agent) drive
//! the occupancy state machine and any status is reachable from any other.

use std::sync::Arc;

use thiserror::Error;

use crate::models::table::{self, TableStatus};
use crate::store::{NewTable, StoreError, TableFilter, TablePatch, TableStore};

/// Errors returned by lifecycle operations. All are caller-correctable.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("table {0} not found")]
    NotFound(i32),
    #[error("table with number '{0}' already exists")]
    DuplicateNumber(String),
    #[error("table {id} is currently {status:?} and cannot be deleted")]
    InUse { id: i32, status: TableStatus },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Lifecycle manager for table records.
///
/// Holds the store behind a trait object so tests can substitute an
/// in-memory fake for the SeaORM repository.
#[derive(Clone)]
pub struct TableService {
    store: Arc<dyn TableStore>,
}

impl TableService {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, id: i32) -> Result<table::Model, TableError> {
        self.store.get(id).await?.ok_or(TableError::NotFound(id))
    }

    /// Returns one page of tables plus the unpaginated total for the same
    /// filter, so callers can render "N of M".
    pub async fn list(
        &self,
        filter: &TableFilter,
        skip: u64,
        limit: u64,
    ) -> Result<(Vec<table::Model>, u64), TableError> {
        let tables = self.store.list(filter, skip, limit).await?;
        let total = self.store.count(filter).await?;
        Ok((tables, total))
    }

    /// Creates a table after checking that the number is free.
    ///
    /// The pre-check exists for a clean error message; the storage unique
    /// constraint is the final arbiter under concurrent creation, and a
    /// constraint violation surfaces as the same `DuplicateNumber` error.
    pub async fn create(&self, new: NewTable) -> Result<table::Model, TableError> {
        if self.store.get_by_number(&new.table_number).await?.is_some() {
            return Err(TableError::DuplicateNumber(new.table_number));
        }

        let number = new.table_number.clone();
        match self.store.insert(new).await {
            Ok(created) => {
                tracing::info!(id = created.id, table_number = %created.table_number, "table created");
                Ok(created)
            }
            Err(StoreError::DuplicateNumber) => Err(TableError::DuplicateNumber(number)),
            Err(err) => Err(err.into()),
        }
    }

    /// Applies a partial update; a rename re-checks number uniqueness.
    pub async fn update(&self, id: i32, patch: TablePatch) -> Result<table::Model, TableError> {
        let existing = self.get(id).await?;

        if let Some(ref new_number) = patch.table_number
            && *new_number != existing.table_number
            && self.store.get_by_number(new_number).await?.is_some()
        {
            return Err(TableError::DuplicateNumber(new_number.clone()));
        }

        let number = patch.table_number.clone();
        match self.store.update(id, patch).await {
            Ok(Some(updated)) => Ok(updated),
            Ok(None) => Err(TableError::NotFound(id)),
            Err(StoreError::DuplicateNumber) => {
                Err(TableError::DuplicateNumber(number.unwrap_or_default()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Writes the new status unconditionally. No transition table: staff and
    /// the booking flow may move a table between any two statuses.
    pub async fn set_status(
        &self,
        id: i32,
        status: TableStatus,
    ) -> Result<table::Model, TableError> {
        let patch = TablePatch {
            status: Some(status),
            ..TablePatch::default()
        };

        match self.store.update(id, patch).await? {
            Some(updated) => {
                tracing::info!(id, ?status, "table status updated");
                Ok(updated)
            }
            None => Err(TableError::NotFound(id)),
        }
    }

    /// Permanently removes a table. Refused while the table is occupied or
    /// reserved, since the resource is in active use and must not disappear
    /// mid-service.
    pub async fn delete(&self, id: i32) -> Result<table::Model, TableError> {
        let existing = self.get(id).await?;

        if matches!(
            existing.status,
            TableStatus::Occupied | TableStatus::Reserved
        ) {
            return Err(TableError::InUse {
                id,
                status: existing.status,
            });
        }

        match self.store.remove(id).await? {
            Some(removed) => {
                tracing::info!(id, table_number = %removed.table_number, "table deleted");
                Ok(removed)
            }
            None => Err(TableError::NotFound(id)),
        }
    }

    /// Seatable, visible tables for booking flows: active + available, with
    /// an optional capacity floor. Ignores pagination by design.
    pub async fn list_available(
        &self,
        min_capacity: Option<i32>,
    ) -> Result<Vec<table::Model>, TableError> {
        Ok(self.store.list_available(min_capacity).await?)
    }

    /// All active tables in one status bucket, for staff dashboards.
    pub async fn list_by_status(
        &self,
        status: TableStatus,
    ) -> Result<Vec<table::Model>, TableError> {
        Ok(self.store.list_by_status(status).await?)
    }
}
