//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test rows with sensible defaults.

use crate::{
    config::settings::{BudgetSettings, Settings},
    core::{
        category::{self, NewCategory},
        paycheck::{self, NewPaycheck, PaycheckWithAllocations},
        session::{self, Session},
        transaction::{self, NewTransaction},
        validate,
    },
    entities::{self, Frequency},
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Routes `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("paycheck_budget=debug")
        .with_test_writer()
        .try_init();
}

/// Registers a user with no starter categories.
pub async fn register_test_user(db: &DatabaseConnection, user_id: &str) -> Result<Session> {
    let registration = session::register(db, user_id, user_id, &Settings::default()).await?;
    Ok(registration.session)
}

/// Fresh database with `user1` registered.
pub async fn setup_with_profile() -> Result<(DatabaseConnection, Session)> {
    let db = setup_test_db().await?;
    let session = register_test_user(&db, "user1").await?;
    Ok((db, session))
}

/// Session built without touching the database, for validation tests on a mock connection.
#[must_use]
pub fn sample_session(user_id: &str) -> Session {
    Session::from(entities::profile::Model {
        user_id: user_id.to_string(),
        display_name: user_id.to_string(),
        category_revision: 0,
        created_at: chrono::Utc::now(),
    })
}

/// In-memory active category row owned by `user1`.
#[must_use]
pub fn sample_category(id: i64, name: &str, percentage: f64) -> entities::category::Model {
    entities::category::Model {
        id,
        user_id: "user1".to_string(),
        name: name.to_string(),
        color: "#4A90D9".to_string(),
        percentage,
        is_active: true,
        created_at: chrono::Utc::now(),
    }
}

/// Creates an active category with a default color.
pub async fn create_test_category(
    db: &DatabaseConnection,
    session: &Session,
    name: &str,
    percentage: f64,
) -> Result<entities::category::Model> {
    category::add_category(
        db,
        session,
        &BudgetSettings::default(),
        NewCategory {
            name: name.to_string(),
            percentage,
            color: "#4A90D9".to_string(),
        },
    )
    .await
}

/// Records a bi-weekly paycheck dated today.
pub async fn create_test_paycheck(
    db: &DatabaseConnection,
    session: &Session,
    amount: f64,
) -> Result<PaycheckWithAllocations> {
    paycheck::create_paycheck(
        db,
        session,
        &BudgetSettings::default(),
        NewPaycheck {
            amount,
            date: validate::today(),
            frequency: Frequency::BiWeekly,
            description: None,
            expected_revision: None,
        },
    )
    .await
}

/// Records a transaction dated today.
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    session: &Session,
    category_id: i64,
    amount: f64,
) -> Result<entities::transaction::Model> {
    transaction::record_transaction(
        db,
        session,
        &BudgetSettings::default(),
        NewTransaction {
            category_id,
            amount,
            date: validate::today(),
            description: None,
        },
    )
    .await
}
