//! Profile enrolment and the authentication gate.
//!
//! Identity comes from the chat platform; this module only decides whether that
//! identity has a budgeting profile. Every core operation takes a [`Session`], so an
//! unregistered caller is turned away before any row is read or written.

use crate::{
    config::settings::Settings,
    core::category,
    entities::{Profile, category as category_entity, profile},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{info, instrument, warn};

/// An authenticated caller with an enrolled profile.
#[derive(Debug, Clone)]
pub struct Session {
    profile: profile::Model,
}

impl Session {
    /// ID every owned row is filtered by.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.profile.user_id
    }

    /// Profile as it was when the session was opened.
    #[must_use]
    pub const fn profile(&self) -> &profile::Model {
        &self.profile
    }
}

impl From<profile::Model> for Session {
    fn from(profile: profile::Model) -> Self {
        Self { profile }
    }
}

/// Outcome of [`register`].
#[derive(Debug, Clone)]
pub struct Registration {
    /// Session for the (new or existing) profile
    pub session: Session,
    /// False when the user was already registered
    pub created: bool,
    /// Number of starter categories seeded
    pub seeded_categories: usize,
}

/// Opens a session for `user_id`.
///
/// # Errors
/// [`Error::NotAuthenticated`] when the user never registered.
pub async fn authenticate<C>(db: &C, user_id: &str) -> Result<Session>
where
    C: ConnectionTrait,
{
    Profile::find_by_id(user_id.to_string())
        .one(db)
        .await?
        .map(Session::from)
        .ok_or(Error::NotAuthenticated)
}

/// Enrols a user, seeding the configured starter categories on first registration.
///
/// Registering twice is harmless and returns the existing profile. Starter categories
/// are all-or-nothing: if any entry is invalid or the set exceeds 100%, none are seeded.
#[instrument(skip(db, settings))]
pub async fn register(
    db: &DatabaseConnection,
    user_id: &str,
    display_name: &str,
    settings: &Settings,
) -> Result<Registration> {
    if user_id.trim().is_empty() {
        return Err(Error::NotAuthenticated);
    }

    let txn = db.begin().await?;

    if let Some(existing) = Profile::find_by_id(user_id.to_string()).one(&txn).await? {
        txn.commit().await?;
        return Ok(Registration {
            session: existing.into(),
            created: false,
            seeded_categories: 0,
        });
    }

    let now = chrono::Utc::now();
    let new_profile = profile::ActiveModel {
        user_id: Set(user_id.to_string()),
        display_name: Set(display_name.trim().to_string()),
        category_revision: Set(0),
        created_at: Set(now),
    }
    .insert(&txn)
    .await?;

    let starters = match category::validate_starter_set(
        &settings.starter_categories,
        settings.budget.max_category_name_len,
    ) {
        Ok(starters) => starters,
        Err(e) => {
            warn!("Skipping starter categories: {e}");
            Vec::new()
        }
    };

    for starter in &starters {
        category_entity::ActiveModel {
            user_id: Set(user_id.to_string()),
            name: Set(starter.name.clone()),
            color: Set(starter.color.clone()),
            percentage: Set(starter.percentage),
            is_active: Set(true),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    info!(
        "Registered profile {user_id} with {} starter categories",
        starters.len()
    );

    Ok(Registration {
        session: new_profile.into(),
        created: true,
        seeded_categories: starters.len(),
    })
}

/// Reads the caller's current category revision.
pub async fn current_revision<C>(db: &C, session: &Session) -> Result<i64>
where
    C: ConnectionTrait,
{
    Profile::find_by_id(session.user_id().to_string())
        .one(db)
        .await?
        .map(|p| p.category_revision)
        .ok_or(Error::NotAuthenticated)
}

/// Increments the caller's category revision with a single `UPDATE`.
///
/// Must run inside the same database transaction as the category mutation it marks.
pub(crate) async fn bump_category_revision<C>(db: &C, user_id: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Profile::update_many()
        .col_expr(
            profile::Column::CategoryRevision,
            Expr::col(profile::Column::CategoryRevision).add(1),
        )
        .filter(profile::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::NotAuthenticated);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::settings::StarterCategory;
    use crate::test_utils::*;

    fn starter(name: &str, percentage: f64) -> StarterCategory {
        StarterCategory {
            name: name.to_string(),
            percentage,
            color: "#336699".to_string(),
        }
    }

    #[tokio::test]
    async fn test_authenticate_requires_profile() -> Result<()> {
        let db = setup_test_db().await?;

        let result = authenticate(&db, "nobody").await;
        assert!(matches!(result, Err(Error::NotAuthenticated)));

        register(&db, "user1", "Alex", &Settings::default()).await?;
        let session = authenticate(&db, "user1").await?;
        assert_eq!(session.user_id(), "user1");
        assert_eq!(session.profile().display_name, "Alex");
        Ok(())
    }

    #[tokio::test]
    async fn test_register_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;

        let first = register(&db, "user1", "Alex", &Settings::default()).await?;
        assert!(first.created);
        let second = register(&db, "user1", "Someone Else", &Settings::default()).await?;
        assert!(!second.created);
        assert_eq!(second.session.profile().display_name, "Alex");
        Ok(())
    }

    #[tokio::test]
    async fn test_register_seeds_starter_categories() -> Result<()> {
        let db = setup_test_db().await?;
        let mut settings = Settings::default();
        settings.starter_categories = vec![starter("Rent", 50.0), starter("Food", 30.0)];

        let registration = register(&db, "user1", "Alex", &settings).await?;
        assert_eq!(registration.seeded_categories, 2);

        let categories = category::list_active_categories(&db, &registration.session).await?;
        assert_eq!(categories.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_register_skips_over_budget_starters() -> Result<()> {
        let db = setup_test_db().await?;
        let mut settings = Settings::default();
        settings.starter_categories = vec![starter("Rent", 70.0), starter("Food", 40.0)];

        let registration = register(&db, "user1", "Alex", &settings).await?;
        assert!(registration.created);
        assert_eq!(registration.seeded_categories, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_bump_category_revision() -> Result<()> {
        let (db, session) = setup_with_profile().await?;
        assert_eq!(current_revision(&db, &session).await?, 0);

        bump_category_revision(&db, session.user_id()).await?;
        bump_category_revision(&db, session.user_id()).await?;
        assert_eq!(current_revision(&db, &session).await?, 2);

        let missing = bump_category_revision(&db, "ghost").await;
        assert!(matches!(missing, Err(Error::NotAuthenticated)));
        Ok(())
    }
}
