//! Transaction business logic - Records and removes expenses.
//!
//! Expenses are always positive amounts charged to one of the caller's active
//! categories. Nothing else is written when an expense is recorded or deleted:
//! spend totals are aggregated from the remaining rows whenever they are read.

use crate::{
    config::settings::BudgetSettings,
    core::{category, money, session::Session, validate},
    entities::{Transaction, transaction},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};
use tracing::{info, instrument};

/// Input for [`record_transaction`].
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Category the expense is charged to
    pub category_id: i64,
    /// Positive amount in dollars
    pub amount: f64,
    /// Day of the expense, not in the future
    pub date: NaiveDate,
    /// Optional note
    pub description: Option<String>,
}

/// Records an expense after validating amount, date, and category.
///
/// # Errors
/// * [`Error::Validation`] if the amount is not positive, exceeds the configured
///   ceiling, the date is in the future, or the category is inactive
/// * [`Error::NotFound`] if the category does not belong to the caller
#[instrument(skip(db, session, settings), fields(user_id = session.user_id()))]
pub async fn record_transaction(
    db: &DatabaseConnection,
    session: &Session,
    settings: &BudgetSettings,
    new: NewTransaction,
) -> Result<transaction::Model> {
    let amount = validate::positive_amount(new.amount, "Transaction amount")?;
    let ceiling = Decimal::from_f64(settings.transaction_ceiling).unwrap_or(Decimal::MAX);
    if amount > ceiling {
        return Err(Error::validation(format!(
            "Transaction amount ${amount} exceeds the ${ceiling} limit"
        )));
    }
    validate::ensure_not_future(new.date, "Transaction")?;
    let description = validate::normalize_description(new.description)?;

    let target = category::get_category(db, session, new.category_id).await?;
    if !target.is_active {
        return Err(Error::validation(format!(
            "Category '{}' is inactive; pick an active category",
            target.name
        )));
    }

    let created = transaction::ActiveModel {
        user_id: Set(session.user_id().to_string()),
        category_id: Set(target.id),
        amount: Set(money::to_f64(amount)),
        date: Set(new.date),
        description: Set(description),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        "Recorded transaction {} of ${:.2} in '{}'",
        created.id, created.amount, target.name
    );
    Ok(created)
}

/// Finds one of the caller's transactions by ID.
pub async fn get_transaction<C>(
    db: &C,
    session: &Session,
    transaction_id: i64,
) -> Result<transaction::Model>
where
    C: ConnectionTrait,
{
    Transaction::find_by_id(transaction_id)
        .filter(transaction::Column::UserId.eq(session.user_id()))
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Transaction", transaction_id))
}

/// Retrieves the caller's transactions, newest first.
pub async fn list_transactions<C>(
    db: &C,
    session: &Session,
    limit: Option<u64>,
) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    Transaction::find()
        .filter(transaction::Column::UserId.eq(session.user_id()))
        .order_by_desc(transaction::Column::Date)
        .order_by_desc(transaction::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a transaction and returns the removed row.
#[instrument(skip(db, session), fields(user_id = session.user_id()))]
pub async fn delete_transaction(
    db: &DatabaseConnection,
    session: &Session,
    transaction_id: i64,
) -> Result<transaction::Model> {
    let existing = get_transaction(db, session, transaction_id).await?;
    existing.clone().delete(db).await?;

    info!(
        "Deleted transaction {} of ${:.2}",
        existing.id, existing.amount
    );
    Ok(existing)
}
