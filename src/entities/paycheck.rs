//! Paycheck entity - A recorded income event.
//!
//! Creating a paycheck freezes the user's category percentages into allocation rows.
//! Only `date` and `description` may change afterwards.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How often the paycheck recurs.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    /// Every week
    #[sea_orm(string_value = "weekly")]
    Weekly,
    /// Every other week
    #[sea_orm(string_value = "bi-weekly")]
    BiWeekly,
    /// Once a month
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// Every three months
    #[sea_orm(string_value = "quarterly")]
    Quarterly,
}

impl Frequency {
    /// Number of paychecks of this frequency in a year.
    #[must_use]
    pub const fn periods_per_year(self) -> u32 {
        match self {
            Self::Weekly => 52,
            Self::BiWeekly => 26,
            Self::Monthly => 12,
            Self::Quarterly => 4,
        }
    }

    /// Label used in replies and exports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::BiWeekly => "bi-weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
        }
    }
}

/// Paycheck database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "paychecks")]
pub struct Model {
    /// Unique identifier for the paycheck
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: String,
    /// Net amount received, rounded to cents
    pub amount: f64,
    /// Pay date; never in the future
    pub date: Date,
    /// Recurrence of this income
    pub frequency: Frequency,
    /// Optional free-form note
    pub description: Option<String>,
    /// When the row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Paycheck and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One paycheck owns many allocations
    #[sea_orm(has_many = "super::allocation::Entity")]
    Allocations,
}

impl Related<super::allocation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Allocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
