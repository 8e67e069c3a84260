//! Allocation entity - The frozen per-category budget of one paycheck.
//!
//! Name, color, percentage and budgeted amount are copied from the category at
//! snapshot time and never change. Spend is not stored here; it is aggregated from
//! transactions on read (see `core::aggregate`).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Allocation database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "allocations")]
pub struct Model {
    /// Unique identifier for the allocation
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Paycheck this allocation belongs to
    pub paycheck_id: i64,
    /// Source category, NULL once the category row is gone
    pub category_id: Option<i64>,
    /// Category name at snapshot time
    pub category_name: String,
    /// Category color at snapshot time
    pub category_color: String,
    /// Category percentage at snapshot time
    pub percentage: f64,
    /// Share of the paycheck, rounded to cents
    pub budgeted_amount: f64,
}

/// Defines relationships between Allocation and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each allocation belongs to one paycheck
    #[sea_orm(
        belongs_to = "super::paycheck::Entity",
        from = "Column::PaycheckId",
        to = "super::paycheck::Column::Id",
        on_delete = "Cascade"
    )]
    Paycheck,
    /// Each allocation may point back at its source category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
}

impl Related<super::paycheck::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Paycheck.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
