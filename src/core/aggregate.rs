//! Spend aggregation and dashboard figures.
//!
//! An allocation's spend is never stored. It is the sum of the caller's
//! transactions in the allocation's category whose date falls inside the
//! paycheck's spend window:
//!
//! * a window starts on the paycheck date and ends (exclusive) on the date of the
//!   next paycheck in `(date, id)` order;
//! * the newest paycheck's window is open-ended;
//! * paychecks sharing a date give the earlier one an empty window.
//!
//! The current breakdown and the lifetime view both go through
//! [`spent_by_category`], so they always agree.

use crate::{
    config::settings::BudgetSettings,
    core::{category, money, paycheck as paycheck_ops, session::Session},
    entities::{Allocation, Paycheck, Transaction, allocation, category as category_entity, paycheck, transaction},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use sea_orm::{QueryOrder, QuerySelect, prelude::*, sea_query::Expr};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Date range a paycheck's allocations collect spend from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpendWindow {
    /// First day counted
    pub start: NaiveDate,
    /// First day no longer counted; `None` for the newest paycheck
    pub end: Option<NaiveDate>,
}

impl SpendWindow {
    /// Whether a transaction dated `date` counts toward this window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && self.end.is_none_or(|end| date < end)
    }

    /// True when no date can fall inside the window.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end.is_some_and(|end| end <= self.start)
    }
}

/// One allocation with its derived spend.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationStatus {
    /// Frozen allocation row
    pub allocation: allocation::Model,
    /// Spend in the paycheck window
    pub spent: f64,
    /// `budgeted - spent`, negative when overspent
    pub remaining: f64,
    /// `spent / budgeted` as a percentage
    pub percent_used: f64,
}

/// Budget versus spend for one paycheck.
#[derive(Debug, Clone, Serialize)]
pub struct PaycheckBreakdown {
    /// The paycheck row
    pub paycheck: paycheck::Model,
    /// Dates counted toward this paycheck
    pub window: SpendWindow,
    /// Allocations with their spend
    pub allocations: Vec<AllocationStatus>,
    /// Sum of budgeted amounts
    pub budgeted_total: f64,
    /// Sum of allocation spend
    pub spent_total: f64,
    /// `budgeted_total - spent_total`
    pub remaining_total: f64,
    /// Income not assigned to any category
    pub unbudgeted_income: f64,
    /// Spend in the window on categories without an allocation
    pub unbudgeted_spend: f64,
    /// Paycheck amount scaled to a monthly figure by its frequency
    pub monthly_equivalent: f64,
}

/// Budget and spend for one category name across every paycheck.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifetimeAllocation {
    /// Snapshot name the rows were merged by
    pub category_name: String,
    /// Color from the most recent snapshot
    pub category_color: String,
    /// Sum of budgeted amounts
    pub budgeted: f64,
    /// Sum of derived spend
    pub spent: f64,
    /// Number of paychecks that allocated to this name
    pub paycheck_count: usize,
}

/// Everything the dashboard view shows.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    /// Active categories, alphabetical
    pub categories: Vec<category_entity::Model>,
    /// Allocated and unallocated percentage
    pub percentages: category::PercentageSummary,
    /// Breakdown of the newest paycheck, if any
    pub latest: Option<PaycheckBreakdown>,
    /// Newest paychecks, newest first
    pub recent_paychecks: Vec<paycheck::Model>,
    /// Lifetime totals merged by category name
    pub lifetime: Vec<LifetimeAllocation>,
}

/// Spend windows keyed by paycheck ID. Input order does not matter.
#[must_use]
pub fn spend_windows(paychecks: &[paycheck::Model]) -> HashMap<i64, SpendWindow> {
    let mut ordered: Vec<&paycheck::Model> = paychecks.iter().collect();
    ordered.sort_by_key(|p| (p.date, p.id));

    ordered
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let end = ordered.get(index + 1).map(|next| next.date);
            (
                p.id,
                SpendWindow {
                    start: p.date,
                    end,
                },
            )
        })
        .collect()
}

/// Sums the caller's spend per category inside `window` with one grouped query.
pub async fn spent_by_category<C>(
    db: &C,
    user_id: &str,
    window: SpendWindow,
) -> Result<HashMap<i64, f64>>
where
    C: ConnectionTrait,
{
    if window.is_empty() {
        return Ok(HashMap::new());
    }

    let mut query = Transaction::find()
        .select_only()
        .column(transaction::Column::CategoryId)
        .column_as(Expr::col(transaction::Column::Amount).sum(), "spent")
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(transaction::Column::Date.gte(window.start));
    if let Some(end) = window.end {
        query = query.filter(transaction::Column::Date.lt(end));
    }

    let rows: Vec<(i64, f64)> = query
        .group_by(transaction::Column::CategoryId)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(category_id, spent)| (category_id, money::round_currency(spent)))
        .collect())
}

/// `spent / budgeted` as a percentage; zero when nothing was budgeted.
#[must_use]
pub fn percent_used(spent: f64, budgeted: f64) -> f64 {
    if budgeted <= 0.0 {
        return 0.0;
    }
    (spent / budgeted) * 100.0
}

/// Spend in one window split between a paycheck's allocations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributedSpend {
    /// Spend per allocation ID
    pub by_allocation: HashMap<i64, f64>,
    /// Spend on categories no allocation claims
    pub unclaimed: f64,
}

/// Category names of every category the caller owns, active or not.
pub async fn category_names<C>(db: &C, session: &Session) -> Result<HashMap<i64, String>>
where
    C: ConnectionTrait,
{
    Ok(category::list_all_categories(db, session)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name.trim().to_string()))
        .collect())
}

/// Assigns each category's window spend to an allocation.
///
/// A category first matches the allocation that references its ID. Otherwise it
/// matches the allocation whose snapshot name equals the category name after
/// trimming, so a category deactivated and recreated under the same name keeps
/// feeding the allocation taken before the switch. Anything left is unclaimed.
#[must_use]
pub fn attribute_spend(
    allocations: &[allocation::Model],
    spent_map: &HashMap<i64, f64>,
    names: &HashMap<i64, String>,
) -> AttributedSpend {
    let by_id: HashMap<i64, i64> = allocations
        .iter()
        .filter_map(|a| a.category_id.map(|id| (id, a.id)))
        .collect();
    let by_name: HashMap<&str, i64> = allocations
        .iter()
        .map(|a| (a.category_name.trim(), a.id))
        .collect();

    let mut attributed = AttributedSpend::default();
    for (category_id, spent) in spent_map {
        let target = by_id.get(category_id).copied().or_else(|| {
            names
                .get(category_id)
                .and_then(|name| by_name.get(name.as_str()).copied())
        });
        match target {
            Some(allocation_id) => {
                let slot = attributed.by_allocation.entry(allocation_id).or_insert(0.0);
                *slot = money::round_currency(*slot + spent);
            }
            None => attributed.unclaimed = money::round_currency(attributed.unclaimed + spent),
        }
    }
    attributed
}

fn status_for(allocation: allocation::Model, attributed: &AttributedSpend) -> AllocationStatus {
    let spent = attributed
        .by_allocation
        .get(&allocation.id)
        .copied()
        .unwrap_or(0.0);
    let budgeted = allocation.budgeted_amount;
    AllocationStatus {
        spent,
        remaining: money::round_currency(budgeted - spent),
        percent_used: percent_used(spent, budgeted),
        allocation,
    }
}

fn monthly_equivalent(paycheck: &paycheck::Model) -> f64 {
    let periods = Decimal::from(paycheck.frequency.periods_per_year());
    Decimal::from_f64(paycheck.amount).map_or(0.0, |amount| {
        money::to_f64(money::round_cents(amount * periods / Decimal::from(12)))
    })
}

fn sum_currency(values: impl IntoIterator<Item = f64>) -> f64 {
    money::round_currency(values.into_iter().sum())
}

async fn all_paychecks<C>(db: &C, session: &Session) -> Result<Vec<paycheck::Model>>
where
    C: ConnectionTrait,
{
    Paycheck::find()
        .filter(paycheck::Column::UserId.eq(session.user_id()))
        .order_by_asc(paycheck::Column::Date)
        .order_by_asc(paycheck::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Spend of a single allocation, using the same window rules as the dashboard.
pub async fn allocation_spent<C>(db: &C, session: &Session, allocation_id: i64) -> Result<f64>
where
    C: ConnectionTrait,
{
    let row = Allocation::find_by_id(allocation_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Allocation", allocation_id))?;
    // Ownership is checked through the parent paycheck.
    let breakdown = paycheck_breakdown(db, session, row.paycheck_id)
        .await
        .map_err(|_| Error::not_found("Allocation", allocation_id))?;

    Ok(breakdown
        .allocations
        .iter()
        .find(|s| s.allocation.id == allocation_id)
        .map_or(0.0, |s| s.spent))
}

/// Budget versus spend for one of the caller's paychecks.
pub async fn paycheck_breakdown<C>(
    db: &C,
    session: &Session,
    paycheck_id: i64,
) -> Result<PaycheckBreakdown>
where
    C: ConnectionTrait,
{
    let paychecks = all_paychecks(db, session).await?;
    let windows = spend_windows(&paychecks);
    let target = paychecks
        .into_iter()
        .find(|p| p.id == paycheck_id)
        .ok_or_else(|| Error::not_found("Paycheck", paycheck_id))?;
    let window = windows
        .get(&paycheck_id)
        .copied()
        .ok_or_else(|| Error::not_found("Paycheck", paycheck_id))?;

    let allocations = paycheck_ops::allocations_for_paycheck(db, paycheck_id).await?;
    let spent_map = spent_by_category(db, session.user_id(), window).await?;
    let names = category_names(db, session).await?;
    let attributed = attribute_spend(&allocations, &spent_map, &names);
    Ok(breakdown_from_parts(target, window, allocations, &attributed))
}

fn breakdown_from_parts(
    paycheck: paycheck::Model,
    window: SpendWindow,
    allocations: Vec<allocation::Model>,
    attributed: &AttributedSpend,
) -> PaycheckBreakdown {
    let unbudgeted_spend = attributed.unclaimed;

    let statuses: Vec<AllocationStatus> = allocations
        .into_iter()
        .map(|a| status_for(a, attributed))
        .collect();
    let budgeted_total = sum_currency(statuses.iter().map(|s| s.allocation.budgeted_amount));
    let spent_total = sum_currency(statuses.iter().map(|s| s.spent));

    PaycheckBreakdown {
        window,
        budgeted_total,
        spent_total,
        remaining_total: money::round_currency(budgeted_total - spent_total),
        unbudgeted_income: money::round_currency(paycheck.amount - budgeted_total),
        unbudgeted_spend,
        monthly_equivalent: monthly_equivalent(&paycheck),
        allocations: statuses,
        paycheck,
    }
}

/// Budgeted and spent totals across every existing paycheck, merged by category name.
///
/// Names are compared after trimming so a category that was deactivated and
/// recreated under the same name keeps one history line.
pub async fn lifetime_allocations<C>(db: &C, session: &Session) -> Result<Vec<LifetimeAllocation>>
where
    C: ConnectionTrait,
{
    let paychecks = all_paychecks(db, session).await?;
    if paychecks.is_empty() {
        return Ok(Vec::new());
    }
    let windows = spend_windows(&paychecks);
    let names = category_names(db, session).await?;

    let ids: Vec<i64> = paychecks.iter().map(|p| p.id).collect();
    let mut by_paycheck: HashMap<i64, Vec<allocation::Model>> = HashMap::new();
    for row in Allocation::find()
        .filter(allocation::Column::PaycheckId.is_in(ids))
        .order_by_asc(allocation::Column::Id)
        .all(db)
        .await?
    {
        by_paycheck.entry(row.paycheck_id).or_default().push(row);
    }

    let mut merged: Vec<LifetimeAllocation> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    // Oldest first, so the last color written is the most recent snapshot.
    for p in &paychecks {
        let Some(rows) = by_paycheck.remove(&p.id) else {
            continue;
        };
        let Some(window) = windows.get(&p.id).copied() else {
            continue;
        };
        let spent_map = spent_by_category(db, session.user_id(), window).await?;
        let attributed = attribute_spend(&rows, &spent_map, &names);

        for row in rows {
            let status = status_for(row, &attributed);
            let name = status.allocation.category_name.trim().to_string();
            let slot = *index_by_name.entry(name.clone()).or_insert_with(|| {
                merged.push(LifetimeAllocation {
                    category_name: name,
                    category_color: String::new(),
                    budgeted: 0.0,
                    spent: 0.0,
                    paycheck_count: 0,
                });
                merged.len() - 1
            });
            let entry = &mut merged[slot];
            entry.category_color.clone_from(&status.allocation.category_color);
            entry.budgeted = money::round_currency(entry.budgeted + status.allocation.budgeted_amount);
            entry.spent = money::round_currency(entry.spent + status.spent);
            entry.paycheck_count += 1;
        }
    }

    merged.sort_by(|a, b| {
        b.budgeted
            .total_cmp(&a.budgeted)
            .then_with(|| a.category_name.cmp(&b.category_name))
    });
    debug!(
        "Lifetime view for {}: {} names over {} paychecks",
        session.user_id(),
        merged.len(),
        paychecks.len()
    );
    Ok(merged)
}

/// Reads everything the dashboard shows in one pass.
pub async fn build_dashboard<C>(
    db: &C,
    session: &Session,
    settings: &BudgetSettings,
) -> Result<Dashboard>
where
    C: ConnectionTrait,
{
    let categories = category::list_active_categories(db, session).await?;
    let percentages = category::summarize_percentages(&categories);
    let recent_paychecks =
        paycheck_ops::list_paychecks(db, session, Some(settings.recent_paycheck_limit)).await?;

    let latest = match recent_paychecks.first() {
        Some(newest) => Some(paycheck_breakdown(db, session, newest.id).await?),
        None => None,
    };
    let lifetime = lifetime_allocations(db, session).await?;

    debug!(
        "Built dashboard for {}: {} categories, {} recent paychecks",
        session.user_id(),
        categories.len(),
        recent_paychecks.len()
    );
    Ok(Dashboard {
        categories,
        percentages,
        latest,
        recent_paychecks,
        lifetime,
    })
}
