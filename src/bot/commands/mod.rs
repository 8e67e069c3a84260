//! Discord command implementations organized by area.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Category management commands
pub mod category;

/// Dashboard, lifetime and export commands
pub mod dashboard;

/// General utility commands
pub mod general;

/// Paycheck commands
pub mod paycheck;

/// Transaction commands
pub mod transaction;

use crate::{bot::BotData, errors::Error};

// Export commands
pub use category::*;
pub use dashboard::*;
pub use general::*;
pub use paycheck::*;
pub use transaction::*;

/// Every slash command the bot registers.
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![
        ping(),
        help(),
        register(),
        categories(),
        add_category(),
        edit_category(),
        remove_category(),
        add_paycheck(),
        edit_paycheck(),
        remove_paycheck(),
        paychecks(),
        spend(),
        remove_transaction(),
        transactions(),
        dashboard(),
        lifetime(),
        export(),
    ]
}
