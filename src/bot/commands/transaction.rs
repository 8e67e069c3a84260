//! Transaction Discord commands - `spend`, `remove_transaction` and `transactions`.
//!
//! Expenses are charged against one of the caller's active categories.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData, commands::category::resolve_category, current_session,
            handlers::autocomplete, reply_private,
        },
        core::{
            category,
            events::BudgetEvent,
            report,
            transaction::{self, NewTransaction},
            validate,
        },
        errors::{Error, Result},
    };
    use std::collections::HashMap;

    /// Records an expense against a category.
    #[poise::command(slash_command, prefix_command)]
    pub async fn spend(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Category to charge"]
        #[autocomplete = "autocomplete::autocomplete_category_name"]
        category_name: String,
        #[description = "Amount spent"] amount: f64,
        #[description = "Date YYYY-MM-DD (defaults to today)"] date: Option<String>,
        #[description = "Optional description of the expense"] description: Option<String>,
    ) -> Result<()> {
        let session = current_session(ctx).await?;
        let data = ctx.data();
        let date = validate::parse_date(date.as_deref())?;
        let target = resolve_category(data, &session, &category_name).await?;

        let recorded = transaction::record_transaction(
            &data.database,
            &session,
            &data.settings.budget,
            NewTransaction {
                category_id: target.id,
                amount,
                date,
                description,
            },
        )
        .await?;
        data.changes.publish(BudgetEvent::TransactionRecorded {
            user_id: session.user_id().to_string(),
            transaction_id: recorded.id,
        });

        reply_private(
            ctx,
            &format!(
                "✅ Spent {} on **{}** (Transaction ID: {})",
                report::format_currency(recorded.amount),
                target.name,
                recorded.id
            ),
        )
        .await
    }

    /// Deletes one of your expenses.
    #[poise::command(slash_command, prefix_command)]
    pub async fn remove_transaction(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Transaction ID (see /transactions)"] id: i64,
    ) -> Result<()> {
        let session = current_session(ctx).await?;
        let data = ctx.data();

        let removed = transaction::delete_transaction(&data.database, &session, id).await?;
        data.changes.publish(BudgetEvent::TransactionDeleted {
            user_id: session.user_id().to_string(),
            transaction_id: removed.id,
        });

        reply_private(
            ctx,
            &format!(
                "🗑️ Deleted transaction #{} ({}).",
                removed.id,
                report::format_currency(removed.amount)
            ),
        )
        .await
    }

    /// Lists your most recent expenses.
    #[poise::command(slash_command, prefix_command)]
    pub async fn transactions(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "How many to show (default 15)"] limit: Option<u64>,
    ) -> Result<()> {
        let session = current_session(ctx).await?;
        let db = &ctx.data().database;

        let rows =
            transaction::list_transactions(db, &session, Some(limit.unwrap_or(15).clamp(1, 50)))
                .await?;
        if rows.is_empty() {
            return reply_private(ctx, "No transactions yet. Record one with `/spend`.").await;
        }

        let names: HashMap<i64, String> = category::list_all_categories(db, &session)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let mut text = String::from("🧾 **Recent transactions**\n");
        for t in &rows {
            let name = names.get(&t.category_id).map(String::as_str);
            text.push_str(&report::format_transaction_line(t, name));
            text.push('\n');
        }
        reply_private(ctx, &text).await
    }
}

pub use inner::*;
