//! Table entity model
//!
//! SeaORM entity for the `tables` table, one row per physical seating unit.
//! `table_number` carries a storage-level unique constraint; `is_active` is a
//! soft-delete flag that hides a table from default listings without removing
//! the row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Occupancy status of a table.
///
/// Transitions are unrestricted: any status may be written over any other.
/// The only place status gates behavior is permanent deletion, which is
/// refused while a table is occupied or reserved.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    #[sea_orm(string_value = "available")]
    Available,
    #[sea_orm(string_value = "occupied")]
    Occupied,
    #[sea_orm(string_value = "reserved")]
    Reserved,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tables")]
pub struct Model {
    /// Surrogate identifier, assigned on insert and never reused
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Staff-facing label, unique across all rows (active or not)
    #[sea_orm(unique)]
    pub table_number: String,

    /// Seats available, always positive
    pub capacity: i32,

    /// Free-text placement description (floor, zone), searchable
    pub location: String,

    /// Current occupancy status
    pub status: TableStatus,

    /// Soft-delete flag; inactive tables are hidden from default listings
    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
