//! Unified error type for the budgeting core and the bot layer.
//!
//! Validation, authentication, conflict and not-found failures are user facing and are
//! reported verbatim by the bot. Everything else is treated as an opaque backend failure.

use thiserror::Error;

/// Every failure the crate can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad input: out-of-range percentage, sum over 100%, future date, bad color, etc.
    #[error("{message}")]
    Validation {
        /// Human readable reason
        message: String,
    },

    /// The caller has no budgeting profile yet.
    #[error("You are not registered yet. Run `/register` first.")]
    NotAuthenticated,

    /// Category state changed while a paycheck snapshot was being taken.
    #[error("Conflict: {message}")]
    Conflict {
        /// What changed underneath the operation
        message: String,
    },

    /// Row does not exist or belongs to another user.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of row that was looked up
        entity: &'static str,
        /// Identifier the caller supplied
        id: String,
    },

    /// Settings or environment could not be loaded.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Any failure reported by the database layer.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// JSON export failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// File system failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Required environment variable missing.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Serenity/poise failure.
    #[error("Discord framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Whether the error is caused by the caller and safe to show verbatim.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::NotAuthenticated
                | Self::Conflict { .. }
                | Self::NotFound { .. }
        )
    }
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_classification() {
        assert!(Error::validation("bad").is_user_facing());
        assert!(Error::NotAuthenticated.is_user_facing());
        assert!(Error::not_found("Category", 7).is_user_facing());
        assert!(
            !Error::Config {
                message: "x".to_string()
            }
            .is_user_facing()
        );
        assert!(!Error::Database(sea_orm::DbErr::Custom("boom".to_string())).is_user_facing());
    }

    #[test]
    fn test_not_found_message() {
        let err = Error::not_found("Paycheck", 42);
        assert_eq!(err.to_string(), "Paycheck 42 not found");
    }
}
