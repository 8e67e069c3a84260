//! Category Discord commands - list, add, edit and remove.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, current_session, handlers::autocomplete, reply_private},
        core::{
            category::{self, CategoryPatch, CategoryRemoval, NewCategory},
            events::BudgetEvent,
            report,
            session::Session,
        },
        entities::category as category_entity,
        errors::{Error, Result},
    };

    /// Colors handed out when `/add_category` is given none.
    const PALETTE: [&str; 8] = [
        "#4A90D9", "#50E3C2", "#F5A623", "#D0021B", "#7ED321", "#9013FE", "#F8E71C", "#8B572A",
    ];

    /// Looks up one of the caller's active categories by the name they typed.
    pub(crate) async fn resolve_category(
        data: &BotData,
        session: &Session,
        name: &str,
    ) -> Result<category_entity::Model> {
        category::find_active_category_by_name(&data.database, session, name)
            .await?
            .ok_or_else(|| Error::not_found("Category", name.trim()))
    }

    fn announce(data: &BotData, session: &Session, category_id: i64) {
        data.changes.publish(BudgetEvent::CategoryChanged {
            user_id: session.user_id().to_string(),
            category_id,
        });
    }

    /// Lists your active categories and the unallocated share.
    #[poise::command(slash_command, prefix_command)]
    pub async fn categories(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let session = current_session(ctx).await?;
        let db = &ctx.data().database;

        let active = category::list_active_categories(db, &session).await?;
        let summary = category::summarize_percentages(&active);
        let text = format!(
            "🗂️ **Your categories**\n{}",
            report::format_category_list(&active, summary)
        );
        reply_private(ctx, &text).await
    }

    /// Adds a spending category. All active categories together may not exceed 100%.
    #[poise::command(slash_command, prefix_command)]
    pub async fn add_category(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Category name"] name: String,
        #[description = "Share of each paycheck, e.g. 25 or 12.5"] percentage: f64,
        #[description = "Hex color like #4A90D9 (optional)"] color: Option<String>,
    ) -> Result<()> {
        let session = current_session(ctx).await?;
        let data = ctx.data();

        let color = match color {
            Some(c) => c,
            None => {
                let count = category::list_all_categories(&data.database, &session)
                    .await?
                    .len();
                PALETTE[count % PALETTE.len()].to_string()
            }
        };

        let created = category::add_category(
            &data.database,
            &session,
            &data.settings.budget,
            NewCategory {
                name,
                percentage,
                color,
            },
        )
        .await?;
        announce(data, &session, created.id);

        let summary = category::percentage_summary(&data.database, &session).await?;
        reply_private(
            ctx,
            &format!(
                "✅ Added **{}** at {:.1}% `{}`. Unallocated: {:.1}%",
                created.name, created.percentage, created.color, summary.unallocated
            ),
        )
        .await
    }

    /// Changes a category's name, percentage or color. Past paychecks keep their snapshot.
    #[poise::command(slash_command, prefix_command)]
    pub async fn edit_category(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Category to edit"]
        #[autocomplete = "autocomplete::autocomplete_category_name"]
        category_name: String,
        #[description = "New name"] name: Option<String>,
        #[description = "New percentage"] percentage: Option<f64>,
        #[description = "New hex color"] color: Option<String>,
    ) -> Result<()> {
        let session = current_session(ctx).await?;
        let data = ctx.data();
        let existing = resolve_category(data, &session, &category_name).await?;

        let updated = category::update_category(
            &data.database,
            &session,
            &data.settings.budget,
            existing.id,
            CategoryPatch {
                name,
                percentage,
                color,
            },
        )
        .await?;
        announce(data, &session, updated.id);

        reply_private(
            ctx,
            &format!(
                "✅ Updated **{}**: {:.1}% `{}`",
                updated.name, updated.percentage, updated.color
            ),
        )
        .await
    }

    /// Removes a category. Categories with history are deactivated instead.
    #[poise::command(slash_command, prefix_command)]
    pub async fn remove_category(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Category to remove"]
        #[autocomplete = "autocomplete::autocomplete_category_name"]
        category_name: String,
    ) -> Result<()> {
        let session = current_session(ctx).await?;
        let data = ctx.data();
        let existing = resolve_category(data, &session, &category_name).await?;

        let removal = category::delete_category(&data.database, &session, existing.id).await?;
        announce(data, &session, existing.id);

        let message = match removal {
            CategoryRemoval::Deleted => format!("🗑️ Deleted **{}**.", existing.name),
            CategoryRemoval::Deactivated(_) => format!(
                "📦 **{}** has paycheck or spending history, so it was deactivated. \
                 Past paychecks still show it.",
                existing.name
            ),
        };
        reply_private(ctx, &message).await
    }
}

pub use inner::*;
