//! Category store - Handles all category-related operations.
//!
//! Categories carry the percentage of every paycheck a user wants to set aside. The
//! one rule enforced here is that a user's active categories never add up to more
//! than 100%. Totals are always recomputed from the active rows and never stored.
//! Every mutation runs in a database transaction that also bumps the owner's
//! category revision, which paycheck snapshots use to detect concurrent edits.

use crate::{
    config::settings::{BudgetSettings, StarterCategory},
    core::{
        money,
        session::{self, Session},
    },
    entities::{Allocation, Category, Transaction, allocation, category, transaction},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// 100.0% expressed in tenths of a percent.
const MAX_TOTAL_TENTHS: i64 = 1000;

/// Input for [`add_category`].
#[derive(Debug, Clone)]
pub struct NewCategory {
    /// Display name
    pub name: String,
    /// Share of each paycheck, (0, 100]
    pub percentage: f64,
    /// `RRGGBB` or `#RRGGBB`
    pub color: String,
}

/// Partial update for [`update_category`]; `None` fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    /// New display name
    pub name: Option<String>,
    /// New percentage
    pub percentage: Option<f64>,
    /// New color
    pub color: Option<String>,
}

impl CategoryPatch {
    /// True when the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.percentage.is_none() && self.color.is_none()
    }
}

/// Validated, normalized category values.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCategory {
    /// Trimmed name
    pub name: String,
    /// Percentage rounded to one decimal
    pub percentage: f64,
    /// Uppercase `#RRGGBB`
    pub color: String,
}

/// Allocated and unallocated share of a paycheck.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentageSummary {
    /// Sum over active categories
    pub total: f64,
    /// `100 - total`
    pub unallocated: f64,
}

/// What [`delete_category`] ended up doing.
#[derive(Debug, Clone)]
pub enum CategoryRemoval {
    /// No history referenced the row, so it is gone.
    Deleted,
    /// History references the row; it was deactivated instead.
    Deactivated(category::Model),
}

/// Trims the name and enforces the length bound.
pub fn normalize_name(name: &str, max_len: usize) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("Category name cannot be empty"));
    }
    if trimmed.chars().count() > max_len {
        return Err(Error::validation(format!(
            "Category name must be at most {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Accepts `RRGGBB` or `#RRGGBB` and returns uppercase `#RRGGBB`.
pub fn normalize_color(color: &str) -> Result<String> {
    let trimmed = color.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::validation(format!(
            "Color must be a 6-digit hex value like #4A90E2, got '{color}'"
        )));
    }
    Ok(format!("#{}", hex.to_ascii_uppercase()))
}

/// Rounds to one decimal and checks the (0, 100] range.
pub fn normalize_percentage(percentage: f64) -> Result<f64> {
    let rounded = money::round_percentage(money::to_decimal(percentage, "Percentage")?);
    if rounded <= Decimal::ZERO || rounded > Decimal::ONE_HUNDRED {
        return Err(Error::validation(format!(
            "Percentage must be greater than 0 and at most 100, got {percentage}"
        )));
    }
    Ok(money::to_f64(rounded))
}

/// Runs every format check on a new category.
pub fn validate_category(new: &NewCategory, max_name_len: usize) -> Result<ValidCategory> {
    Ok(ValidCategory {
        name: normalize_name(&new.name, max_name_len)?,
        percentage: normalize_percentage(new.percentage)?,
        color: normalize_color(&new.color)?,
    })
}

/// Validates configured starter categories as one set.
pub(crate) fn validate_starter_set(
    starters: &[StarterCategory],
    max_name_len: usize,
) -> Result<Vec<ValidCategory>> {
    let mut valid: Vec<ValidCategory> = Vec::with_capacity(starters.len());
    for starter in starters {
        let candidate = validate_category(
            &NewCategory {
                name: starter.name.clone(),
                percentage: starter.percentage,
                color: starter.color.clone(),
            },
            max_name_len,
        )?;
        if valid
            .iter()
            .any(|v| v.name.eq_ignore_ascii_case(&candidate.name))
        {
            return Err(Error::validation(format!(
                "Duplicate starter category '{}'",
                candidate.name
            )));
        }
        valid.push(candidate);
    }

    let total = valid
        .iter()
        .map(|v| money::percentage_tenths(v.percentage))
        .sum();
    ensure_total_within_limit(total)?;
    Ok(valid)
}

fn ensure_total_within_limit(total_tenths: i64) -> Result<()> {
    if total_tenths > MAX_TOTAL_TENTHS {
        return Err(Error::validation(format!(
            "Total allocation would be {}%, which exceeds 100%",
            Decimal::new(total_tenths, 1)
        )));
    }
    Ok(())
}

fn ensure_unique_name(
    active: &[category::Model],
    name: &str,
    except_id: Option<i64>,
) -> Result<()> {
    let clash = active
        .iter()
        .any(|c| Some(c.id) != except_id && c.name.eq_ignore_ascii_case(name));
    if clash {
        return Err(Error::validation(format!(
            "A category named '{name}' already exists"
        )));
    }
    Ok(())
}

fn active_total_tenths<'a>(categories: impl IntoIterator<Item = &'a category::Model>) -> i64 {
    categories
        .into_iter()
        .filter(|c| c.is_active)
        .map(|c| money::percentage_tenths(c.percentage))
        .sum()
}

/// Total and unallocated percentage of the given categories (inactive rows ignored).
#[must_use]
pub fn summarize_percentages(categories: &[category::Model]) -> PercentageSummary {
    let total = Decimal::new(active_total_tenths(categories), 1);
    let unallocated = (Decimal::ONE_HUNDRED - total).max(Decimal::ZERO);
    PercentageSummary {
        total: money::to_f64(total),
        unallocated: money::to_f64(unallocated),
    }
}

/// Active categories of a user in creation order (the order allocations are written in).
pub(crate) async fn active_categories<C>(db: &C, user_id: &str) -> Result<Vec<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .filter(category::Column::IsActive.eq(true))
        .order_by_asc(category::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the caller's active categories, ordered alphabetically by name.
pub async fn list_active_categories<C>(db: &C, session: &Session) -> Result<Vec<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find()
        .filter(category::Column::UserId.eq(session.user_id()))
        .filter(category::Column::IsActive.eq(true))
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every category the caller ever created, active or not.
pub async fn list_all_categories<C>(db: &C, session: &Session) -> Result<Vec<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find()
        .filter(category::Column::UserId.eq(session.user_id()))
        .order_by_asc(category::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds one of the caller's categories by ID.
///
/// Rows owned by someone else are reported as not found.
pub async fn get_category<C>(db: &C, session: &Session, category_id: i64) -> Result<category::Model>
where
    C: ConnectionTrait,
{
    Category::find_by_id(category_id)
        .filter(category::Column::UserId.eq(session.user_id()))
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Category", category_id))
}

/// Finds an active category by name, ignoring ASCII case.
pub async fn find_active_category_by_name<C>(
    db: &C,
    session: &Session,
    name: &str,
) -> Result<Option<category::Model>>
where
    C: ConnectionTrait,
{
    let wanted = name.trim();
    Ok(active_categories(db, session.user_id())
        .await?
        .into_iter()
        .find(|c| c.name.eq_ignore_ascii_case(wanted)))
}

/// Current allocated/unallocated split, recomputed from the active rows.
pub async fn percentage_summary<C>(db: &C, session: &Session) -> Result<PercentageSummary>
where
    C: ConnectionTrait,
{
    let active = active_categories(db, session.user_id()).await?;
    debug!(
        "Computed percentage summary over {} active categories for {}",
        active.len(),
        session.user_id()
    );
    Ok(summarize_percentages(&active))
}

/// Adds a category after checking formats, name uniqueness, and the 100% limit.
///
/// On rejection nothing is written. A caller without a profile gets
/// [`Error::NotAuthenticated`].
#[instrument(skip(db, session, settings), fields(user_id = session.user_id()))]
pub async fn add_category(
    db: &DatabaseConnection,
    session: &Session,
    settings: &BudgetSettings,
    new: NewCategory,
) -> Result<category::Model> {
    let valid = validate_category(&new, settings.max_category_name_len)?;

    let txn = db.begin().await?;

    let active = active_categories(&txn, session.user_id()).await?;
    ensure_unique_name(&active, &valid.name, None)?;
    ensure_total_within_limit(
        active_total_tenths(&active) + money::percentage_tenths(valid.percentage),
    )?;
    session::bump_category_revision(&txn, session.user_id()).await?;

    let created = category::ActiveModel {
        user_id: Set(session.user_id().to_string()),
        name: Set(valid.name),
        color: Set(valid.color),
        percentage: Set(valid.percentage),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(
        "Added category {} '{}' at {}%",
        created.id, created.name, created.percentage
    );
    Ok(created)
}

/// Applies a patch to an active category.
///
/// The 100% check substitutes the patched percentage for the old one.
#[instrument(skip(db, session, settings), fields(user_id = session.user_id()))]
pub async fn update_category(
    db: &DatabaseConnection,
    session: &Session,
    settings: &BudgetSettings,
    category_id: i64,
    patch: CategoryPatch,
) -> Result<category::Model> {
    if patch.is_empty() {
        return Err(Error::validation(
            "Specify at least one of name, percentage, or color to update",
        ));
    }
    let name = patch
        .name
        .as_deref()
        .map(|n| normalize_name(n, settings.max_category_name_len))
        .transpose()?;
    let percentage = patch.percentage.map(normalize_percentage).transpose()?;
    let color = patch.color.as_deref().map(normalize_color).transpose()?;

    let txn = db.begin().await?;

    let existing = get_category(&txn, session, category_id).await?;
    if !existing.is_active {
        return Err(Error::validation(format!(
            "Category '{}' is inactive and cannot be edited",
            existing.name
        )));
    }

    let active = active_categories(&txn, session.user_id()).await?;
    if let Some(ref new_name) = name {
        ensure_unique_name(&active, new_name, Some(category_id))?;
    }
    if let Some(new_percentage) = percentage {
        let others = active.iter().filter(|c| c.id != category_id);
        ensure_total_within_limit(
            active_total_tenths(others) + money::percentage_tenths(new_percentage),
        )?;
    }

    let mut model: category::ActiveModel = existing.into();
    if let Some(new_name) = name {
        model.name = Set(new_name);
    }
    if let Some(new_percentage) = percentage {
        model.percentage = Set(new_percentage);
    }
    if let Some(new_color) = color {
        model.color = Set(new_color);
    }
    let updated = model.update(&txn).await?;

    session::bump_category_revision(&txn, session.user_id()).await?;
    txn.commit().await?;

    info!("Updated category {} '{}'", updated.id, updated.name);
    Ok(updated)
}

/// Marks a category inactive. Already inactive categories are returned unchanged.
#[instrument(skip(db, session), fields(user_id = session.user_id()))]
pub async fn deactivate_category(
    db: &DatabaseConnection,
    session: &Session,
    category_id: i64,
) -> Result<category::Model> {
    let txn = db.begin().await?;

    let existing = get_category(&txn, session, category_id).await?;
    if !existing.is_active {
        txn.commit().await?;
        return Ok(existing);
    }

    let mut model: category::ActiveModel = existing.into();
    model.is_active = Set(false);
    let updated = model.update(&txn).await?;

    session::bump_category_revision(&txn, session.user_id()).await?;
    txn.commit().await?;

    info!("Deactivated category {} '{}'", updated.id, updated.name);
    Ok(updated)
}

/// Removes a category, falling back to deactivation when allocations or
/// transactions still reference it.
#[instrument(skip(db, session), fields(user_id = session.user_id()))]
pub async fn delete_category(
    db: &DatabaseConnection,
    session: &Session,
    category_id: i64,
) -> Result<CategoryRemoval> {
    let txn = db.begin().await?;

    let existing = get_category(&txn, session, category_id).await?;

    let allocation_refs = Allocation::find()
        .filter(allocation::Column::CategoryId.eq(category_id))
        .count(&txn)
        .await?;
    let transaction_refs = Transaction::find()
        .filter(transaction::Column::CategoryId.eq(category_id))
        .count(&txn)
        .await?;

    let removal = if allocation_refs == 0 && transaction_refs == 0 {
        existing.delete(&txn).await?;
        CategoryRemoval::Deleted
    } else {
        let mut model: category::ActiveModel = existing.into();
        model.is_active = Set(false);
        CategoryRemoval::Deactivated(model.update(&txn).await?)
    };

    session::bump_category_revision(&txn, session.user_id()).await?;
    txn.commit().await?;

    info!(
        "Removed category {category_id} ({allocation_refs} allocations, {transaction_refs} transactions reference it): {removal:?}"
    );
    Ok(removal)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::session::current_revision;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn new_category(name: &str, percentage: f64) -> NewCategory {
        NewCategory {
            name: name.to_string(),
            percentage,
            color: "4a90e2".to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_category_without_profile() -> Result<()> {
        let db = setup_test_db().await?;
        let ghost = sample_session("ghost");

        let result = add_category(&db, &ghost, &BudgetSettings::default(), new_category("Rent", 40.0)).await;
        assert!(matches!(result, Err(Error::NotAuthenticated)));
        assert!(Category::find().all(&db).await?.is_empty());
        Ok(())
    }

    #[test]
    fn test_normalize_color() {
        assert_eq!(normalize_color("4a90e2").unwrap(), "#4A90E2");
        assert_eq!(normalize_color(" #00ff00 ").unwrap(), "#00FF00");
        assert!(normalize_color("#12345").is_err());
        assert!(normalize_color("#GGGGGG").is_err());
        assert!(normalize_color("red").is_err());
    }

    #[test]
    fn test_normalize_percentage() {
        assert_eq!(normalize_percentage(33.33).unwrap(), 33.3);
        assert_eq!(normalize_percentage(12.25).unwrap(), 12.3);
        assert_eq!(normalize_percentage(100.0).unwrap(), 100.0);
        assert!(normalize_percentage(0.0).is_err());
        assert!(normalize_percentage(0.04).is_err());
        assert!(normalize_percentage(100.1).is_err());
        assert!(normalize_percentage(-5.0).is_err());
        assert!(normalize_percentage(f64::NAN).is_err());
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Rent ", 50).unwrap(), "Rent");
        assert!(normalize_name("   ", 50).is_err());
        assert!(normalize_name(&"x".repeat(51), 50).is_err());
    }

    #[test]
    fn test_summarize_ignores_inactive() {
        let mut rent = sample_category(1, "Rent", 50.0);
        let food = sample_category(2, "Food", 33.3);
        rent.is_active = false;

        let summary = summarize_percentages(&[rent, food]);
        assert_eq!(summary.total, 33.3);
        assert_eq!(summary.unallocated, 66.7);
    }

    #[tokio::test]
    async fn test_add_category_validation() -> Result<()> {
        // Validation fails before any query reaches the database.
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let session = sample_session("user1");
        let settings = BudgetSettings::default();

        let result = add_category(&db, &session, &settings, new_category("", 10.0)).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = add_category(&db, &session, &settings, new_category("Rent", 0.0)).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let mut bad_color = new_category("Rent", 10.0);
        bad_color.color = "blue".to_string();
        let result = add_category(&db, &session, &settings, bad_color).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_category_rejects_over_budget() -> Result<()> {
        let (db, session) = setup_with_profile().await?;
        let settings = BudgetSettings::default();

        add_category(&db, &session, &settings, new_category("Rent", 60.0)).await?;
        add_category(&db, &session, &settings, new_category("Food", 40.0)).await?;

        let result = add_category(&db, &session, &settings, new_category("Fun", 0.1)).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        // State unchanged after the rejection
        let active = list_active_categories(&db, &session).await?;
        assert_eq!(active.len(), 2);
        let summary = percentage_summary(&db, &session).await?;
        assert_eq!(summary.total, 100.0);
        assert_eq!(summary.unallocated, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_tenths_never_drift_over_limit() -> Result<()> {
        let (db, session) = setup_with_profile().await?;
        let settings = BudgetSettings::default();

        // 0.1 * 1000 in floats is not exactly 100; tenths arithmetic is.
        for i in 0..3 {
            add_category(&db, &session, &settings, new_category(&format!("C{i}"), 33.3)).await?;
        }
        add_category(&db, &session, &settings, new_category("Rest", 0.1)).await?;
        let summary = percentage_summary(&db, &session).await?;
        assert_eq!(summary.total, 100.0);

        let result = add_category(&db, &session, &settings, new_category("More", 0.1)).await;
        assert!(result.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_add_category_rejects_duplicate_name() -> Result<()> {
        let (db, session) = setup_with_profile().await?;
        let settings = BudgetSettings::default();

        add_category(&db, &session, &settings, new_category("Rent", 10.0)).await?;
        let result = add_category(&db, &session, &settings, new_category("rent", 10.0)).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_category_substitutes_percentage() -> Result<()> {
        let (db, session) = setup_with_profile().await?;
        let settings = BudgetSettings::default();

        let rent = add_category(&db, &session, &settings, new_category("Rent", 50.0)).await?;
        add_category(&db, &session, &settings, new_category("Food", 40.0)).await?;

        // 50 -> 60 keeps the total at exactly 100
        let patch = CategoryPatch {
            percentage: Some(60.0),
            ..Default::default()
        };
        let updated = update_category(&db, &session, &settings, rent.id, patch).await?;
        assert_eq!(updated.percentage, 60.0);

        // 60 -> 61 would make 101
        let patch = CategoryPatch {
            percentage: Some(61.0),
            ..Default::default()
        };
        let result = update_category(&db, &session, &settings, rent.id, patch).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let reloaded = get_category(&db, &session, rent.id).await?;
        assert_eq!(reloaded.percentage, 60.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_category_name_and_color() -> Result<()> {
        let (db, session) = setup_with_profile().await?;
        let settings = BudgetSettings::default();

        let rent = add_category(&db, &session, &settings, new_category("Rent", 50.0)).await?;
        add_category(&db, &session, &settings, new_category("Food", 10.0)).await?;

        let patch = CategoryPatch {
            name: Some("Food".to_string()),
            ..Default::default()
        };
        let clash = update_category(&db, &session, &settings, rent.id, patch).await;
        assert!(matches!(clash, Err(Error::Validation { .. })));

        let patch = CategoryPatch {
            name: Some("Housing".to_string()),
            color: Some("#ff8800".to_string()),
            ..Default::default()
        };
        let updated = update_category(&db, &session, &settings, rent.id, patch).await?;
        assert_eq!(updated.name, "Housing");
        assert_eq!(updated.color, "#FF8800");

        let empty = update_category(&db, &session, &settings, rent.id, CategoryPatch::default())
            .await;
        assert!(matches!(empty, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_deactivate_frees_percentage() -> Result<()> {
        let (db, session) = setup_with_profile().await?;
        let settings = BudgetSettings::default();

        let rent = add_category(&db, &session, &settings, new_category("Rent", 80.0)).await?;
        let deactivated = deactivate_category(&db, &session, rent.id).await?;
        assert!(!deactivated.is_active);

        // Freed share can be reused, and the name is available again
        add_category(&db, &session, &settings, new_category("Rent", 90.0)).await?;
        let summary = percentage_summary(&db, &session).await?;
        assert_eq!(summary.total, 90.0);

        // Inactive categories cannot be edited
        let patch = CategoryPatch {
            percentage: Some(5.0),
            ..Default::default()
        };
        let result = update_category(&db, &session, &settings, rent.id, patch).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_category_hard_and_soft() -> Result<()> {
        let (db, session) = setup_with_profile().await?;

        let unused = create_test_category(&db, &session, "Unused", 10.0).await?;
        let used = create_test_category(&db, &session, "Used", 20.0).await?;
        create_test_transaction(&db, &session, used.id, 5.0).await?;

        let removal = delete_category(&db, &session, unused.id).await?;
        assert!(matches!(removal, CategoryRemoval::Deleted));
        assert!(matches!(
            get_category(&db, &session, unused.id).await,
            Err(Error::NotFound { .. })
        ));

        let removal = delete_category(&db, &session, used.id).await?;
        assert!(matches!(removal, CategoryRemoval::Deactivated(ref m) if !m.is_active));
        assert!(!get_category(&db, &session, used.id).await?.is_active);
        Ok(())
    }

    #[tokio::test]
    async fn test_categories_are_private() -> Result<()> {
        let (db, alice) = setup_with_profile().await?;
        let bob = register_test_user(&db, "bob").await?;
        let settings = BudgetSettings::default();

        let rent = create_test_category(&db, &alice, "Rent", 100.0).await?;

        // Bob has his own 100% to hand out
        add_category(&db, &bob, &settings, new_category("Rent", 100.0)).await?;

        assert!(matches!(
            get_category(&db, &bob, rent.id).await,
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(
            deactivate_category(&db, &bob, rent.id).await,
            Err(Error::NotFound { .. })
        ));
        assert!(get_category(&db, &alice, rent.id).await?.is_active);
        Ok(())
    }

    #[tokio::test]
    async fn test_mutations_bump_revision() -> Result<()> {
        let (db, session) = setup_with_profile().await?;
        let settings = BudgetSettings::default();

        let rent = add_category(&db, &session, &settings, new_category("Rent", 50.0)).await?;
        assert_eq!(current_revision(&db, &session).await?, 1);

        let patch = CategoryPatch {
            percentage: Some(40.0),
            ..Default::default()
        };
        update_category(&db, &session, &settings, rent.id, patch).await?;
        assert_eq!(current_revision(&db, &session).await?, 2);

        // Rejected mutation leaves the revision alone
        let result = add_category(&db, &session, &settings, new_category("Big", 70.0)).await;
        assert!(result.is_err());
        assert_eq!(current_revision(&db, &session).await?, 2);

        deactivate_category(&db, &session, rent.id).await?;
        assert_eq!(current_revision(&db, &session).await?, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_active_category_by_name() -> Result<()> {
        let (db, session) = setup_with_profile().await?;
        let rent = create_test_category(&db, &session, "Rent", 50.0).await?;

        let found = find_active_category_by_name(&db, &session, " rent ").await?;
        assert_eq!(found.map(|c| c.id), Some(rent.id));

        deactivate_category(&db, &session, rent.id).await?;
        assert!(
            find_active_category_by_name(&db, &session, "Rent")
                .await?
                .is_none()
        );
        Ok(())
    }

    #[test]
    fn test_validate_starter_set() {
        let starter = |name: &str, percentage: f64| StarterCategory {
            name: name.to_string(),
            percentage,
            color: "#000000".to_string(),
        };

        let ok = validate_starter_set(&[starter("Rent", 50.0), starter("Food", 50.0)], 50);
        assert_eq!(ok.unwrap().len(), 2);

        let over = validate_starter_set(&[starter("Rent", 60.0), starter("Food", 50.0)], 50);
        assert!(over.is_err());

        let dup = validate_starter_set(&[starter("Rent", 10.0), starter("RENT", 10.0)], 50);
        assert!(dup.is_err());
    }
}
