//! Framework-agnostic budgeting operations.
//!
//! Every function here takes a database connection and, for user data, a
//! [`session::Session`]. Nothing in this module knows about Discord.

pub mod aggregate;
pub mod category;
pub mod events;
pub mod export;
pub mod money;
pub mod paycheck;
pub mod report;
pub mod session;
pub mod transaction;
pub mod validate;
