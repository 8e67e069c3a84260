//! JSON export of everything a user owns.

use crate::{
    core::{
        aggregate::{self, SpendWindow},
        category, paycheck as paycheck_ops,
        session::Session,
        transaction as transaction_ops,
    },
    entities::{Allocation, Profile, allocation, category as category_entity, paycheck, profile, transaction},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, prelude::*};
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

/// Bumped whenever the document shape changes.
pub const EXPORT_FORMAT_VERSION: &str = "1.0";

/// Row counts and export timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct ExportMetadata {
    /// When the document was built
    pub exported_at: DateTime<Utc>,
    /// Document shape version
    pub format_version: &'static str,
    /// Categories, active and inactive
    pub category_count: usize,
    /// Paychecks
    pub paycheck_count: usize,
    /// Allocation rows across all paychecks
    pub allocation_count: usize,
    /// Transactions
    pub transaction_count: usize,
}

/// Allocation row plus its derived spend.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedAllocation {
    /// Stored allocation row
    #[serde(flatten)]
    pub allocation: allocation::Model,
    /// Spend inside the paycheck's window
    pub spent_amount: f64,
}

/// Paycheck with its allocations nested.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedPaycheck {
    /// Stored paycheck row
    #[serde(flatten)]
    pub paycheck: paycheck::Model,
    /// Dates counted toward this paycheck
    pub spend_window: Option<SpendWindow>,
    /// Frozen allocations
    pub allocations: Vec<ExportedAllocation>,
}

/// The whole export document.
#[derive(Debug, Clone, Serialize)]
pub struct ExportDocument {
    /// Counts and timestamp
    pub metadata: ExportMetadata,
    /// The caller's profile
    pub profile: profile::Model,
    /// Every category, including inactive ones
    pub categories: Vec<category_entity::Model>,
    /// Paychecks, newest first
    pub paychecks: Vec<ExportedPaycheck>,
    /// Transactions, newest first
    pub transactions: Vec<transaction::Model>,
}

/// Collects the caller's profile, categories (active and inactive), paychecks with
/// allocations and derived spend, and transactions.
pub async fn export_user_data<C>(db: &C, session: &Session) -> Result<ExportDocument>
where
    C: ConnectionTrait,
{
    let profile = Profile::find_by_id(session.user_id().to_string())
        .one(db)
        .await?
        .ok_or(Error::NotAuthenticated)?;
    let categories = category::list_all_categories(db, session).await?;
    let names: HashMap<i64, String> = categories
        .iter()
        .map(|c| (c.id, c.name.trim().to_string()))
        .collect();
    let paychecks = paycheck_ops::list_paychecks(db, session, None).await?;
    let transactions = transaction_ops::list_transactions(db, session, None).await?;
    let windows = aggregate::spend_windows(&paychecks);

    let ids: Vec<i64> = paychecks.iter().map(|p| p.id).collect();
    let mut by_paycheck: HashMap<i64, Vec<allocation::Model>> = HashMap::new();
    if !ids.is_empty() {
        for row in Allocation::find()
            .filter(allocation::Column::PaycheckId.is_in(ids))
            .order_by_asc(allocation::Column::Id)
            .all(db)
            .await?
        {
            by_paycheck.entry(row.paycheck_id).or_default().push(row);
        }
    }

    let mut exported = Vec::with_capacity(paychecks.len());
    let mut allocation_count = 0;
    for p in paychecks {
        let window = windows.get(&p.id).copied();
        let spent_map = match window {
            Some(w) => aggregate::spent_by_category(db, session.user_id(), w).await?,
            None => HashMap::new(),
        };
        let rows = by_paycheck.remove(&p.id).unwrap_or_default();
        let attributed = aggregate::attribute_spend(&rows, &spent_map, &names);
        let allocations: Vec<ExportedAllocation> = rows
            .into_iter()
            .map(|a| ExportedAllocation {
                spent_amount: attributed.by_allocation.get(&a.id).copied().unwrap_or(0.0),
                allocation: a,
            })
            .collect();
        allocation_count += allocations.len();
        exported.push(ExportedPaycheck {
            paycheck: p,
            spend_window: window,
            allocations,
        });
    }

    let metadata = ExportMetadata {
        exported_at: Utc::now(),
        format_version: EXPORT_FORMAT_VERSION,
        category_count: categories.len(),
        paycheck_count: exported.len(),
        allocation_count,
        transaction_count: transactions.len(),
    };
    info!(
        "Exported data for {}: {} categories, {} paychecks, {} transactions",
        session.user_id(),
        metadata.category_count,
        metadata.paycheck_count,
        metadata.transaction_count
    );

    Ok(ExportDocument {
        metadata,
        profile,
        categories,
        paychecks: exported,
        transactions,
    })
}

/// [`export_user_data`] rendered as pretty-printed JSON.
pub async fn export_json<C>(db: &C, session: &Session) -> Result<String>
where
    C: ConnectionTrait,
{
    let document = export_user_data(db, session).await?;
    Ok(serde_json::to_string_pretty(&document)?)
}
