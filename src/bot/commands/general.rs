//! General Discord commands - ping, help, and registration.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, reply_private},
        core::session,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any database operations.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Paycheck Budget Help**\n\
        Split every paycheck across percentage categories and track spending against it.\n\n\
        **Getting started**\n\
        • `/register` - Creates your budget profile.\n\n\
        **Categories**\n\
        • `/categories` - Lists your active categories and the unallocated share.\n\
        • `/add_category <name> <percentage> [color]` - Adds a category (total stays at or under 100%).\n\
        • `/edit_category <category> [name] [percentage] [color]` - Changes a category.\n\
        • `/remove_category <category>` - Removes a category, or deactivates it if it has history.\n\n\
        **Paychecks**\n\
        • `/add_paycheck <amount> <frequency> [date] [description]` - Records a paycheck and snapshots the categories.\n\
        • `/edit_paycheck <id> [date] [description]` - Changes a paycheck's date or note.\n\
        • `/remove_paycheck <id>` - Deletes a paycheck and its allocations.\n\
        • `/paychecks` - Lists recent paychecks.\n\n\
        **Spending**\n\
        • `/spend <category> <amount> [date] [description]` - Records an expense.\n\
        • `/remove_transaction <id>` - Deletes an expense.\n\
        • `/transactions` - Lists recent expenses.\n\n\
        **Insights**\n\
        • `/dashboard` - Budget versus spend for your latest paycheck.\n\
        • `/lifetime` - Totals per category across all paychecks.\n\
        • `/export` - Downloads all your data as JSON.\n\n\
        Dates use the `YYYY-MM-DD` format and default to today.";

        reply_private(ctx, help_text).await
    }

    /// Creates your budget profile. Running it again does nothing.
    #[poise::command(slash_command, prefix_command)]
    pub async fn register(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let user_id = ctx.author().id.to_string();
        let display_name = ctx.author().name.clone();

        let registration =
            session::register(&data.database, &user_id, &display_name, &data.settings).await?;

        let message = if !registration.created {
            "ℹ️ You are already registered.".to_string()
        } else if registration.seeded_categories > 0 {
            format!(
                "✅ Welcome, {display_name}! {} starter categories were added. See `/categories`.",
                registration.seeded_categories
            )
        } else {
            format!("✅ Welcome, {display_name}! Add a category with `/add_category` to get started.")
        };
        reply_private(ctx, &message).await
    }
}

// Re-export all commands
pub use inner::*;
