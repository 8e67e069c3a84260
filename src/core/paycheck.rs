//! Paycheck snapshot builder.
//!
//! Creating a paycheck freezes the caller's active categories into allocation rows:
//! each row copies the category's name, color, and percentage and stores its share
//! of the paycheck. The paycheck and its allocations are written in one database
//! transaction, so either all rows exist or none do. Later category edits never
//! touch existing allocations.

use crate::{
    config::settings::BudgetSettings,
    core::{
        category,
        money::{self, RoundingPolicy},
        session::Session,
        validate,
    },
    entities::{Allocation, Frequency, Paycheck, Profile, allocation, category as category_entity, paycheck},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Input for [`create_paycheck`].
#[derive(Debug, Clone)]
pub struct NewPaycheck {
    /// Amount received, must be positive
    pub amount: f64,
    /// Pay date, must not be in the future
    pub date: NaiveDate,
    /// Recurrence of this income
    pub frequency: Frequency,
    /// Optional note
    pub description: Option<String>,
    /// Category revision the caller last saw; a mismatch aborts the snapshot
    pub expected_revision: Option<i64>,
}

/// Editable paycheck fields; amount, frequency and allocations are fixed.
#[derive(Debug, Clone, Default)]
pub struct PaycheckPatch {
    /// New pay date
    pub date: Option<NaiveDate>,
    /// New note; a blank string clears it
    pub description: Option<String>,
}

/// A paycheck together with its frozen allocations.
#[derive(Debug, Clone, Serialize)]
pub struct PaycheckWithAllocations {
    /// The paycheck row
    pub paycheck: paycheck::Model,
    /// One row per category that was active at creation
    pub allocations: Vec<allocation::Model>,
}

/// Allocation values computed from a category before they are written.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationDraft {
    /// Source category
    pub category_id: i64,
    /// Snapshot of the category name
    pub category_name: String,
    /// Snapshot of the category color
    pub category_color: String,
    /// Snapshot of the category percentage
    pub percentage: f64,
    /// Share of the paycheck in dollars
    pub budgeted_amount: f64,
}

/// Computes one allocation per category, index-aligned with `categories`.
pub fn build_allocations(
    amount: Decimal,
    categories: &[category_entity::Model],
    policy: RoundingPolicy,
) -> Result<Vec<AllocationDraft>> {
    let percentages = categories
        .iter()
        .map(|c| money::to_decimal(c.percentage, "Percentage").map(money::round_percentage))
        .collect::<Result<Vec<_>>>()?;

    let shares = money::split_amount(amount, &percentages, policy);

    Ok(categories
        .iter()
        .zip(shares)
        .map(|(c, share)| AllocationDraft {
            category_id: c.id,
            category_name: c.name.clone(),
            category_color: c.color.clone(),
            percentage: c.percentage,
            budgeted_amount: money::to_f64(share),
        })
        .collect())
}

/// Records a paycheck and snapshots the active categories into allocations.
///
/// With no active categories the paycheck is still created, with zero allocations.
///
/// # Errors
/// * [`Error::Validation`] for a non-positive amount or a future date
/// * [`Error::Conflict`] when `expected_revision` no longer matches, or the stored
///   categories exceed 100%; nothing is written in either case
#[instrument(skip(db, session, settings), fields(user_id = session.user_id()))]
pub async fn create_paycheck(
    db: &DatabaseConnection,
    session: &Session,
    settings: &BudgetSettings,
    new: NewPaycheck,
) -> Result<PaycheckWithAllocations> {
    let amount = validate::positive_amount(new.amount, "Paycheck amount")?;
    validate::ensure_not_future(new.date, "Paycheck")?;
    let description = validate::normalize_description(new.description)?;

    let txn = db.begin().await?;

    let profile = Profile::find_by_id(session.user_id().to_string())
        .one(&txn)
        .await?
        .ok_or(Error::NotAuthenticated)?;
    if let Some(expected) = new.expected_revision {
        if expected != profile.category_revision {
            warn!(
                "Paycheck snapshot aborted: categories at revision {}, caller saw {expected}",
                profile.category_revision
            );
            return Err(Error::Conflict {
                message: "Your categories changed while this paycheck was being recorded. Review them and try again.".to_string(),
            });
        }
    }

    let categories = category::active_categories(&txn, session.user_id()).await?;
    let summary = category::summarize_percentages(&categories);
    if summary.total > 100.0 {
        warn!("Active categories sum to {}%", summary.total);
        return Err(Error::Conflict {
            message: format!(
                "Active categories add up to {}%; fix them before recording a paycheck",
                summary.total
            ),
        });
    }

    let drafts = build_allocations(amount, &categories, settings.rounding)?;

    let created = paycheck::ActiveModel {
        user_id: Set(session.user_id().to_string()),
        amount: Set(money::to_f64(amount)),
        date: Set(new.date),
        frequency: Set(new.frequency),
        description: Set(description),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut allocations = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let row = allocation::ActiveModel {
            paycheck_id: Set(created.id),
            category_id: Set(Some(draft.category_id)),
            category_name: Set(draft.category_name),
            category_color: Set(draft.category_color),
            percentage: Set(draft.percentage),
            budgeted_amount: Set(draft.budgeted_amount),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        allocations.push(row);
    }

    txn.commit().await?;

    info!(
        "Created paycheck {} for ${:.2} with {} allocations",
        created.id,
        created.amount,
        allocations.len()
    );
    Ok(PaycheckWithAllocations {
        paycheck: created,
        allocations,
    })
}

/// Finds one of the caller's paychecks by ID.
pub async fn get_paycheck<C>(db: &C, session: &Session, paycheck_id: i64) -> Result<paycheck::Model>
where
    C: ConnectionTrait,
{
    Paycheck::find_by_id(paycheck_id)
        .filter(paycheck::Column::UserId.eq(session.user_id()))
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Paycheck", paycheck_id))
}

/// Retrieves the caller's paychecks, newest first (by date, then creation order).
pub async fn list_paychecks<C>(
    db: &C,
    session: &Session,
    limit: Option<u64>,
) -> Result<Vec<paycheck::Model>>
where
    C: ConnectionTrait,
{
    Paycheck::find()
        .filter(paycheck::Column::UserId.eq(session.user_id()))
        .order_by_desc(paycheck::Column::Date)
        .order_by_desc(paycheck::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Allocations of one paycheck in the order they were written.
pub async fn allocations_for_paycheck<C>(db: &C, paycheck_id: i64) -> Result<Vec<allocation::Model>>
where
    C: ConnectionTrait,
{
    Allocation::find()
        .filter(allocation::Column::PaycheckId.eq(paycheck_id))
        .order_by_asc(allocation::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Loads a paycheck with its allocations.
pub async fn get_paycheck_with_allocations<C>(
    db: &C,
    session: &Session,
    paycheck_id: i64,
) -> Result<PaycheckWithAllocations>
where
    C: ConnectionTrait,
{
    let paycheck = get_paycheck(db, session, paycheck_id).await?;
    let allocations = allocations_for_paycheck(db, paycheck.id).await?;
    debug!(
        "Loaded paycheck {} with {} allocations",
        paycheck.id,
        allocations.len()
    );
    Ok(PaycheckWithAllocations {
        paycheck,
        allocations,
    })
}

/// Changes a paycheck's date and/or description.
#[instrument(skip(db, session), fields(user_id = session.user_id()))]
pub async fn update_paycheck(
    db: &DatabaseConnection,
    session: &Session,
    paycheck_id: i64,
    patch: PaycheckPatch,
) -> Result<paycheck::Model> {
    if patch.date.is_none() && patch.description.is_none() {
        return Err(Error::validation(
            "Specify a new date or description to update",
        ));
    }
    if let Some(date) = patch.date {
        validate::ensure_not_future(date, "Paycheck")?;
    }
    let description = patch
        .description
        .map(|d| validate::normalize_description(Some(d)))
        .transpose()?;

    let existing = get_paycheck(db, session, paycheck_id).await?;
    let mut model: paycheck::ActiveModel = existing.into();
    if let Some(date) = patch.date {
        model.date = Set(date);
    }
    if let Some(description) = description {
        model.description = Set(description);
    }
    let updated = model.update(db).await?;

    info!("Updated paycheck {}", updated.id);
    Ok(updated)
}

/// Deletes a paycheck and all of its allocations. Returns the number of allocations removed.
#[instrument(skip(db, session), fields(user_id = session.user_id()))]
pub async fn delete_paycheck(
    db: &DatabaseConnection,
    session: &Session,
    paycheck_id: i64,
) -> Result<u64> {
    let txn = db.begin().await?;

    let existing = get_paycheck(&txn, session, paycheck_id).await?;
    let removed = Allocation::delete_many()
        .filter(allocation::Column::PaycheckId.eq(existing.id))
        .exec(&txn)
        .await?
        .rows_affected;
    existing.delete(&txn).await?;

    txn.commit().await?;

    info!("Deleted paycheck {paycheck_id} and {removed} allocations");
    Ok(removed)
}
