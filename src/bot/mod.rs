//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the budgeting core,
//! including all slash commands, autocomplete handlers, and bot context management.

/// Cached dashboards and their invalidation listener
pub mod cache;
/// Discord command implementations (categories, paychecks, transactions, dashboard)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::settings::Settings,
    core::{
        events::ChangeFeed,
        session::{self, Session},
    },
    errors::{Error, Result},
};
use cache::DashboardCache;
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument};

/// Discord caps a message at 2000 characters.
const MAX_MESSAGE_LEN: usize = 2000;

/// Shared data available to all bot commands.
/// This structure holds the database connection, loaded settings and the
/// change notification plumbing.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Settings loaded at startup
    pub settings: Settings,
    /// Mutations are announced here after they commit
    pub changes: ChangeFeed,
    /// Dashboards built by `/dashboard`, dropped on change
    pub dashboards: DashboardCache,
}

impl BotData {
    /// Creates a new `BotData` and starts the dashboard invalidation listener.
    /// Must be called inside a Tokio runtime.
    #[must_use]
    pub fn new(database: DatabaseConnection, settings: Settings) -> Self {
        let changes = ChangeFeed::new();
        let dashboards = DashboardCache::new();
        // Runs until `changes` is dropped with the bot.
        drop(dashboards.spawn_invalidator(&changes));
        Self {
            database,
            settings,
            changes,
            dashboards,
        }
    }
}

/// Session for the invoking Discord user.
pub async fn current_session(ctx: poise::Context<'_, BotData, Error>) -> Result<Session> {
    session::authenticate(&ctx.data().database, &ctx.author().id.to_string()).await
}

/// Cuts `text` to fit a single Discord message.
#[must_use]
pub fn fit_message(text: &str) -> String {
    if text.chars().count() <= MAX_MESSAGE_LEN {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_MESSAGE_LEN - 1).collect();
    cut.push('…');
    cut
}

/// Replies with a message only the invoking user can see.
pub async fn reply_private(ctx: poise::Context<'_, BotData, Error>, text: &str) -> Result<()> {
    ctx.send(
        poise::CreateReply::default()
            .content(fit_message(text))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            let message = if error.is_user_facing() {
                info!("Command `{}` rejected: {error}", ctx.command().name);
                format!("❌ {error}")
            } else {
                error!("Error in command `{}`: {error:?}", ctx.command().name);
                "❌ Something went wrong on our side. Please try again later.".to_string()
            };
            if let Err(e) = reply_private(ctx, &message).await {
                error!("Failed to send error message: {e}");
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Connects to Discord and serves slash commands until the client stops.
#[instrument(skip(token, database, settings))]
pub async fn run_bot(token: String, database: DatabaseConnection, settings: Settings) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData::new(database, settings))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e:?}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_message_leaves_short_text() {
        assert_eq!(fit_message("hello"), "hello");
    }

    #[test]
    fn test_fit_message_truncates() {
        let long = "x".repeat(MAX_MESSAGE_LEN + 50);
        let cut = fit_message(&long);
        assert_eq!(cut.chars().count(), MAX_MESSAGE_LEN);
        assert!(cut.ends_with('…'));
    }
}
