//! Table repository for database operations
//!
//! SeaORM-backed implementation of [`TableStore`]. Filtering matches the
//! management surface semantics: `active_only` hides soft-deleted rows,
//! `status` narrows to one occupancy bucket, and `search` is a
//! case-insensitive substring match against the table number or location.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use std::sync::Arc;

use crate::models::table::{self, Entity as Table, TableStatus};
use crate::store::{NewTable, StoreError, TableFilter, TablePatch, TableStore};

/// Repository for table database operations
#[derive(Debug, Clone)]
pub struct TableRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl TableRepository {
    /// Creates a new TableRepository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Builds a select with the list/count filter applied, ordered by id so
    /// pagination is stable across requests.
    fn filtered(filter: &TableFilter) -> Select<Table> {
        let mut query = Table::find().order_by_asc(table::Column::Id);

        if filter.active_only {
            query = query.filter(table::Column::IsActive.eq(true));
        }
        if let Some(status) = filter.status {
            query = query.filter(table::Column::Status.eq(status));
        }
        if let Some(ref term) = filter.search {
            query = query.filter(search_condition(term));
        }

        query
    }
}

/// Case-insensitive substring match on table number OR location.
///
/// Uses `lower(col) LIKE lower('%term%')` rather than Postgres `ILIKE` so the
/// same query runs against the SQLite test database.
fn search_condition(term: &str) -> Condition {
    let pattern = format!("%{}%", term.to_lowercase());
    Condition::any()
        .add(Expr::expr(Func::lower(Expr::col(table::Column::TableNumber))).like(pattern.clone()))
        .add(Expr::expr(Func::lower(Expr::col(table::Column::Location))).like(pattern))
}

/// Detects a unique-constraint violation across the supported backends.
fn is_unique_violation(error: &sea_orm::DbErr) -> bool {
    use sea_orm::RuntimeErr;

    const PG_UNIQUE: &str = "23505";
    const SQLITE_DUPLICATE_CODES: &[&str] = &["1555", "2067"];

    let runtime_err = match error {
        sea_orm::DbErr::Query(RuntimeErr::SqlxError(sqlx_err))
        | sea_orm::DbErr::Exec(RuntimeErr::SqlxError(sqlx_err)) => sqlx_err,
        _ => return false,
    };

    let Some(db_error) = runtime_err.as_database_error() else {
        return false;
    };

    if db_error.is_unique_violation() {
        return true;
    }

    match db_error.code() {
        Some(code) => {
            let code = code.as_ref();
            code == PG_UNIQUE || SQLITE_DUPLICATE_CODES.contains(&code)
        }
        None => false,
    }
}

fn map_write_err(error: sea_orm::DbErr) -> StoreError {
    if is_unique_violation(&error) {
        tracing::debug!(?error, "unique constraint violation on table_number");
        StoreError::DuplicateNumber
    } else {
        StoreError::Db(error)
    }
}

#[async_trait]
impl TableStore for TableRepository {
    async fn get(&self, id: i32) -> Result<Option<table::Model>, StoreError> {
        Ok(Table::find_by_id(id).one(&*self.db).await?)
    }

    async fn get_by_number(&self, table_number: &str) -> Result<Option<table::Model>, StoreError> {
        Ok(Table::find()
            .filter(table::Column::TableNumber.eq(table_number))
            .one(&*self.db)
            .await?)
    }

    async fn list(
        &self,
        filter: &TableFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<table::Model>, StoreError> {
        Ok(Self::filtered(filter)
            .offset(skip)
            .limit(limit)
            .all(&*self.db)
            .await?)
    }

    async fn count(&self, filter: &TableFilter) -> Result<u64, StoreError> {
        Ok(Self::filtered(filter).count(&*self.db).await?)
    }

    async fn insert(&self, new: NewTable) -> Result<table::Model, StoreError> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let active = table::ActiveModel {
            id: NotSet,
            table_number: Set(new.table_number),
            capacity: Set(new.capacity),
            location: Set(new.location),
            status: Set(new.status),
            is_active: Set(new.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        active.insert(&*self.db).await.map_err(map_write_err)
    }

    async fn update(
        &self,
        id: i32,
        patch: TablePatch,
    ) -> Result<Option<table::Model>, StoreError> {
        let Some(existing) = Table::find_by_id(id).one(&*self.db).await? else {
            return Ok(None);
        };

        let mut model: table::ActiveModel = existing.into();

        if let Some(table_number) = patch.table_number {
            model.table_number = Set(table_number);
        }
        if let Some(capacity) = patch.capacity {
            model.capacity = Set(capacity);
        }
        if let Some(location) = patch.location {
            model.location = Set(location);
        }
        if let Some(status) = patch.status {
            model.status = Set(status);
        }
        if let Some(is_active) = patch.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(chrono::Utc::now().into());

        model.update(&*self.db).await.map(Some).map_err(map_write_err)
    }

    async fn remove(&self, id: i32) -> Result<Option<table::Model>, StoreError> {
        let Some(existing) = Table::find_by_id(id).one(&*self.db).await? else {
            return Ok(None);
        };

        Table::delete_by_id(id).exec(&*self.db).await?;
        Ok(Some(existing))
    }

    async fn list_available(
        &self,
        min_capacity: Option<i32>,
    ) -> Result<Vec<table::Model>, StoreError> {
        let mut query = Table::find()
            .filter(table::Column::Status.eq(TableStatus::Available))
            .filter(table::Column::IsActive.eq(true))
            .order_by_asc(table::Column::Id);

        if let Some(min_capacity) = min_capacity {
            query = query.filter(table::Column::Capacity.gte(min_capacity));
        }

        Ok(query.all(&*self.db).await?)
    }

    async fn list_by_status(&self, status: TableStatus) -> Result<Vec<table::Model>, StoreError> {
        Ok(Table::find()
            .filter(table::Column::Status.eq(status))
            .filter(table::Column::IsActive.eq(true))
            .order_by_asc(table::Column::Id)
            .all(&*self.db)
            .await?)
    }
}
