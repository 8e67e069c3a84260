//! Category entity - A named, colored, percentage-weighted spending bucket.
//!
//! Categories are soft-deleted (`is_active = false`) once history references them,
//! so allocations and transactions never lose their target row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: String,
    /// Display name (e.g., "Rent", "Groceries")
    pub name: String,
    /// Normalized `#RRGGBB` color
    pub color: String,
    /// Share of each paycheck, 0-100 with one decimal
    pub percentage: f64,
    /// Inactive categories are hidden and excluded from the 100% total
    pub is_active: bool,
    /// When the category was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One category is snapshotted into many allocations
    #[sea_orm(has_many = "super::allocation::Entity")]
    Allocations,
    /// One category has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::allocation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Allocations.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
