//! Insight commands - dashboard, lifetime totals and JSON export.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, current_session, reply_private},
        core::{aggregate, export as export_ops, report},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use tracing::debug;

    /// Shows budget versus spend for your latest paycheck.
    #[poise::command(slash_command, prefix_command)]
    pub async fn dashboard(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let session = current_session(ctx).await?;
        let data = ctx.data();

        let dashboard = if let Some(cached) = data.dashboards.get(session.user_id()).await {
            cached
        } else {
            ctx.defer_ephemeral().await?;
            let ticket = data.dashboards.ticket(session.user_id()).await;
            let built =
                aggregate::build_dashboard(&data.database, &session, &data.settings.budget)
                    .await?;
            if data
                .dashboards
                .insert_if_current(session.user_id(), ticket, built.clone())
                .await
            {
                debug!("Cached dashboard for {}", session.user_id());
            }
            built
        };

        reply_private(ctx, &report::format_dashboard(&dashboard)).await
    }

    /// Shows budgeted and spent totals per category across every paycheck.
    #[poise::command(slash_command, prefix_command)]
    pub async fn lifetime(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let session = current_session(ctx).await?;
        let rows = aggregate::lifetime_allocations(&ctx.data().database, &session).await?;

        let text = format!(
            "📈 **Lifetime totals**\n{}",
            report::format_lifetime(&rows)
        );
        reply_private(ctx, &text).await
    }

    /// Sends all of your budget data as a JSON file.
    #[poise::command(slash_command, prefix_command)]
    pub async fn export(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let session = current_session(ctx).await?;
        ctx.defer_ephemeral().await?;

        let json = export_ops::export_json(&ctx.data().database, &session).await?;
        let filename = format!("budget-export-{}.json", chrono::Utc::now().format("%Y%m%d"));

        ctx.send(
            poise::CreateReply::default()
                .content("📦 Here is your budget data.")
                .attachment(serenity::CreateAttachment::bytes(json.into_bytes(), filename))
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }
}

pub use inner::*;
