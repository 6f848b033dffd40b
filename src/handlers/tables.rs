//! # Tables API Handlers
//!
//! HTTP endpoints for table management, mapped 1:1 onto the lifecycle
//! service: paginated listing with filters and search, fixed-predicate
//! availability and per-status views, create, partial update, status-only
//! update, and guarded delete. Input validation happens here, before any
//! lifecycle logic runs.

use crate::auth::StaffAuth;
use crate::error::{ApiError, validation_error};
use crate::models::table::{self, TableStatus};
use crate::server::AppState;
use crate::store::{NewTable, TableFilter, TablePatch};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

const DEFAULT_PAGE_SIZE: u64 = 100;
const MAX_PAGE_SIZE: u64 = 500;

/// Query parameters for the tables listing
#[derive(Debug, Deserialize, Serialize, IntoParams)]
pub struct ListTablesQuery {
    /// Number of rows to skip (default: 0)
    pub skip: Option<u64>,
    /// Maximum number of rows to return (default: 100, max: 500)
    pub limit: Option<u64>,
    /// Filter only active tables (default: true)
    pub active_only: Option<bool>,
    /// Filter by occupancy status
    pub status: Option<TableStatus>,
    /// Search by table number or location (case-insensitive substring)
    pub search: Option<String>,
}

/// Query parameters for the availability listing
#[derive(Debug, Deserialize, Serialize, IntoParams)]
pub struct AvailableTablesQuery {
    /// Minimum capacity required
    pub min_capacity: Option<i32>,
}

/// Table information for API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TableInfo {
    /// Unique identifier for the table
    pub id: i32,
    /// Staff-facing table number, unique across all tables
    pub table_number: String,
    /// Seats available
    pub capacity: i32,
    /// Free-text placement description
    pub location: String,
    /// Current occupancy status
    pub status: TableStatus,
    /// Whether the table appears in default listings
    pub is_active: bool,
    /// Creation timestamp (RFC3339)
    pub created_at: String,
    /// Last update timestamp (RFC3339)
    pub updated_at: String,
}

impl From<table::Model> for TableInfo {
    fn from(model: table::Model) -> Self {
        let to_rfc3339 = |dt: sea_orm::prelude::DateTimeWithTimeZone| {
            let utc: DateTime<Utc> = dt.naive_utc().and_utc();
            utc.to_rfc3339()
        };
        Self {
            id: model.id,
            table_number: model.table_number,
            capacity: model.capacity,
            location: model.location,
            status: model.status,
            is_active: model.is_active,
            created_at: to_rfc3339(model.created_at),
            updated_at: to_rfc3339(model.updated_at),
        }
    }
}

/// Response wrapper for the tables listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TablesResponse {
    /// One page of tables
    pub tables: Vec<TableInfo>,
    /// Unpaginated total for the same filters
    pub total: u64,
}

/// Request body for creating a table
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateTableRequest {
    /// Table number, unique across all tables
    pub table_number: String,
    /// Seats available, must be positive
    pub capacity: i32,
    /// Free-text placement description
    #[serde(default)]
    pub location: Option<String>,
    /// Initial occupancy status (default: available)
    #[serde(default)]
    pub status: Option<TableStatus>,
    /// Visibility flag (default: true)
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl CreateTableRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if self.table_number.trim().is_empty() {
            return Err(validation_error(
                "Invalid table",
                json!({ "table_number": "must not be empty" }),
            ));
        }
        if self.capacity <= 0 {
            return Err(validation_error(
                "Invalid table",
                json!({ "capacity": "must be a positive integer" }),
            ));
        }
        Ok(())
    }
}

/// Request body for updating a table; omitted fields are left unchanged
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateTableRequest {
    #[serde(default)]
    pub table_number: Option<String>,
    #[serde(default)]
    pub capacity: Option<i32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub status: Option<TableStatus>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl UpdateTableRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(ref number) = self.table_number
            && number.trim().is_empty()
        {
            return Err(validation_error(
                "Invalid table",
                json!({ "table_number": "must not be empty" }),
            ));
        }
        if let Some(capacity) = self.capacity
            && capacity <= 0
        {
            return Err(validation_error(
                "Invalid table",
                json!({ "capacity": "must be a positive integer" }),
            ));
        }
        Ok(())
    }

    fn into_patch(self) -> TablePatch {
        TablePatch {
            table_number: self.table_number,
            capacity: self.capacity,
            location: self.location,
            status: self.status,
            is_active: self.is_active,
        }
    }
}

/// Request body for the status-only update
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct StatusUpdateRequest {
    pub status: TableStatus,
}

fn validate_page(query: &ListTablesQuery) -> Result<(u64, u64), ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    if !(1..=MAX_PAGE_SIZE).contains(&limit) {
        return Err(validation_error(
            "Invalid pagination",
            json!({ "limit": format!("must be between 1 and {}", MAX_PAGE_SIZE) }),
        ));
    }
    Ok((query.skip.unwrap_or(0), limit))
}

/// Lists tables with pagination, filters, and search
#[utoipa::path(
    get,
    path = "/tables",
    params(ListTablesQuery),
    responses(
        (status = 200, description = "One page of tables plus the unpaginated total", body = TablesResponse),
        (status = 400, description = "Validation error", body = ApiError)
    ),
    tag = "tables"
)]
pub async fn list_tables(
    State(state): State<AppState>,
    Query(query): Query<ListTablesQuery>,
) -> Result<Json<TablesResponse>, ApiError> {
    let (skip, limit) = validate_page(&query)?;

    let filter = TableFilter {
        active_only: query.active_only.unwrap_or(true),
        status: query.status,
        search: query.search,
    };

    let (tables, total) = state.table_service().list(&filter, skip, limit).await?;

    Ok(Json(TablesResponse {
        tables: tables.into_iter().map(TableInfo::from).collect(),
        total,
    }))
}

/// Lists seatable tables for booking flows
#[utoipa::path(
    get,
    path = "/tables/available",
    params(AvailableTablesQuery),
    responses(
        (status = 200, description = "Active, available tables meeting the capacity floor", body = [TableInfo])
    ),
    tag = "tables"
)]
pub async fn list_available_tables(
    State(state): State<AppState>,
    Query(query): Query<AvailableTablesQuery>,
) -> Result<Json<Vec<TableInfo>>, ApiError> {
    let tables = state
        .table_service()
        .list_available(query.min_capacity)
        .await?;
    Ok(Json(tables.into_iter().map(TableInfo::from).collect()))
}

/// Lists active tables in one status bucket (staff only)
#[utoipa::path(
    get,
    path = "/tables/by-status/{status}",
    security(("bearer_auth" = [])),
    params(("status" = TableStatus, Path, description = "Occupancy status bucket")),
    responses(
        (status = 200, description = "Active tables in the given status", body = [TableInfo]),
        (status = 401, description = "Unauthorized", body = ApiError)
    ),
    tag = "tables"
)]
pub async fn list_tables_by_status(
    State(state): State<AppState>,
    _auth: StaffAuth,
    Path(status): Path<TableStatus>,
) -> Result<Json<Vec<TableInfo>>, ApiError> {
    let tables = state.table_service().list_by_status(status).await?;
    Ok(Json(tables.into_iter().map(TableInfo::from).collect()))
}

/// Creates a new table (staff only)
#[utoipa::path(
    post,
    path = "/tables",
    security(("bearer_auth" = [])),
    request_body = CreateTableRequest,
    responses(
        (status = 200, description = "Created table", body = TableInfo),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 409, description = "Table number already exists", body = ApiError)
    ),
    tag = "tables"
)]
pub async fn create_table(
    State(state): State<AppState>,
    _auth: StaffAuth,
    Json(request): Json<CreateTableRequest>,
) -> Result<Json<TableInfo>, ApiError> {
    request.validate()?;

    let new = NewTable {
        table_number: request.table_number,
        capacity: request.capacity,
        location: request.location.unwrap_or_default(),
        status: request.status.unwrap_or(TableStatus::Available),
        is_active: request.is_active.unwrap_or(true),
    };

    let created = state.table_service().create(new).await?;
    Ok(Json(TableInfo::from(created)))
}

/// Gets a table by id
#[utoipa::path(
    get,
    path = "/tables/{id}",
    params(("id" = i32, Path, description = "Table identifier")),
    responses(
        (status = 200, description = "The table", body = TableInfo),
        (status = 404, description = "Table not found", body = ApiError)
    ),
    tag = "tables"
)]
pub async fn get_table(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TableInfo>, ApiError> {
    let table = state.table_service().get(id).await?;
    Ok(Json(TableInfo::from(table)))
}

/// Updates a table (staff only); omitted fields are left unchanged
#[utoipa::path(
    put,
    path = "/tables/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Table identifier")),
    request_body = UpdateTableRequest,
    responses(
        (status = 200, description = "Updated table", body = TableInfo),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 404, description = "Table not found", body = ApiError),
        (status = 409, description = "Table number already exists", body = ApiError)
    ),
    tag = "tables"
)]
pub async fn update_table(
    State(state): State<AppState>,
    _auth: StaffAuth,
    Path(id): Path<i32>,
    Json(request): Json<UpdateTableRequest>,
) -> Result<Json<TableInfo>, ApiError> {
    request.validate()?;

    let updated = state
        .table_service()
        .update(id, request.into_patch())
        .await?;
    Ok(Json(TableInfo::from(updated)))
}

/// Updates only the occupancy status of a table (staff only)
#[utoipa::path(
    patch,
    path = "/tables/{id}/status",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Table identifier")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Updated table", body = TableInfo),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 404, description = "Table not found", body = ApiError)
    ),
    tag = "tables"
)]
pub async fn update_table_status(
    State(state): State<AppState>,
    _auth: StaffAuth,
    Path(id): Path<i32>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<TableInfo>, ApiError> {
    let updated = state.table_service().set_status(id, request.status).await?;
    Ok(Json(TableInfo::from(updated)))
}

/// Permanently deletes a table (staff only); refused while occupied or reserved
#[utoipa::path(
    delete,
    path = "/tables/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Table identifier")),
    responses(
        (status = 200, description = "Deleted table", body = TableInfo),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 404, description = "Table not found", body = ApiError),
        (status = 409, description = "Table is occupied or reserved", body = ApiError)
    ),
    tag = "tables"
)]
pub async fn delete_table(
    State(state): State<AppState>,
    _auth: StaffAuth,
    Path(id): Path<i32>,
) -> Result<Json<TableInfo>, ApiError> {
    let deleted = state.table_service().delete(id).await?;
    Ok(Json(TableInfo::from(deleted)))
}
