//! Profile entity - One row per enrolled user.
//!
//! The profile gates every budgeting operation and carries the `category_revision`
//! counter that paycheck snapshots use to detect concurrent category edits.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Profile database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    /// External (Discord) user ID that owns every other row
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    /// Name shown in exports and dashboards
    pub display_name: String,
    /// Bumped by every category mutation
    pub category_revision: i64,
    /// When the user registered
    pub created_at: DateTimeUtc,
}

/// Profiles are referenced by `user_id` only; no foreign keys are declared.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
