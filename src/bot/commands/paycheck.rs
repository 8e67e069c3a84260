//! Paycheck Discord commands - record, edit, remove and list.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, current_session, reply_private},
        core::{
            events::BudgetEvent,
            paycheck::{self, NewPaycheck, PaycheckPatch},
            report, validate,
        },
        entities::Frequency,
        errors::{Error, Result},
    };

    /// How often the paycheck arrives.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum FrequencyChoice {
        #[name = "Weekly"]
        Weekly,
        #[name = "Bi-weekly"]
        BiWeekly,
        #[name = "Monthly"]
        Monthly,
        #[name = "Quarterly"]
        Quarterly,
    }

    impl From<FrequencyChoice> for Frequency {
        fn from(choice: FrequencyChoice) -> Self {
            match choice {
                FrequencyChoice::Weekly => Self::Weekly,
                FrequencyChoice::BiWeekly => Self::BiWeekly,
                FrequencyChoice::Monthly => Self::Monthly,
                FrequencyChoice::Quarterly => Self::Quarterly,
            }
        }
    }

    /// Records a paycheck and splits it across your active categories.
    #[poise::command(slash_command, prefix_command)]
    pub async fn add_paycheck(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Amount received"] amount: f64,
        #[description = "How often you are paid"] frequency: FrequencyChoice,
        #[description = "Pay date YYYY-MM-DD (defaults to today)"] date: Option<String>,
        #[description = "Optional note"] description: Option<String>,
    ) -> Result<()> {
        let session = current_session(ctx).await?;
        let data = ctx.data();
        let date = validate::parse_date(date.as_deref())?;

        // Categories edited after this command started invalidate the snapshot.
        let expected_revision = Some(session.profile().category_revision);
        let created = paycheck::create_paycheck(
            &data.database,
            &session,
            &data.settings.budget,
            NewPaycheck {
                amount,
                date,
                frequency: frequency.into(),
                description,
                expected_revision,
            },
        )
        .await?;
        data.changes.publish(BudgetEvent::PaycheckCreated {
            user_id: session.user_id().to_string(),
            paycheck_id: created.paycheck.id,
        });

        let mut text = format!(
            "✅ Recorded paycheck {}\n",
            report::format_paycheck_line(&created.paycheck)
        );
        for a in &created.allocations {
            text.push_str(&format!(
                "• **{}** {:.1}% → {}\n",
                a.category_name,
                a.percentage,
                report::format_currency(a.budgeted_amount)
            ));
        }
        if created.allocations.is_empty() {
            text.push_str("No active categories, so the whole amount is unbudgeted.");
        }
        reply_private(ctx, &text).await
    }

    /// Changes a paycheck's date or note. Amount and allocations cannot change.
    #[poise::command(slash_command, prefix_command)]
    pub async fn edit_paycheck(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Paycheck ID (see /paychecks)"] id: i64,
        #[description = "New pay date YYYY-MM-DD"] date: Option<String>,
        #[description = "New note (blank clears it)"] description: Option<String>,
    ) -> Result<()> {
        let session = current_session(ctx).await?;
        let data = ctx.data();

        let date = match date {
            Some(d) => Some(validate::parse_date(Some(&d))?),
            None => None,
        };
        let updated = paycheck::update_paycheck(
            &data.database,
            &session,
            id,
            PaycheckPatch { date, description },
        )
        .await?;
        data.changes.publish(BudgetEvent::PaycheckUpdated {
            user_id: session.user_id().to_string(),
            paycheck_id: updated.id,
        });

        reply_private(
            ctx,
            &format!("✅ Updated {}", report::format_paycheck_line(&updated)),
        )
        .await
    }

    /// Deletes a paycheck and its allocations.
    #[poise::command(slash_command, prefix_command)]
    pub async fn remove_paycheck(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Paycheck ID (see /paychecks)"] id: i64,
    ) -> Result<()> {
        let session = current_session(ctx).await?;
        let data = ctx.data();

        let removed = paycheck::delete_paycheck(&data.database, &session, id).await?;
        data.changes.publish(BudgetEvent::PaycheckDeleted {
            user_id: session.user_id().to_string(),
            paycheck_id: id,
        });

        reply_private(
            ctx,
            &format!("🗑️ Deleted paycheck #{id} and {removed} allocation(s)."),
        )
        .await
    }

    /// Lists your most recent paychecks.
    #[poise::command(slash_command, prefix_command)]
    pub async fn paychecks(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "How many to show (default 10)"] limit: Option<u64>,
    ) -> Result<()> {
        let session = current_session(ctx).await?;
        let db = &ctx.data().database;

        let rows = paycheck::list_paychecks(db, &session, Some(limit.unwrap_or(10).clamp(1, 50))).await?;
        if rows.is_empty() {
            return reply_private(ctx, "No paychecks yet. Record one with `/add_paycheck`.").await;
        }

        let mut text = String::from("💵 **Recent paychecks**\n");
        for p in &rows {
            text.push_str(&report::format_paycheck_line(p));
            text.push('\n');
        }
        reply_private(ctx, &text).await
    }
}

pub use inner::*;
