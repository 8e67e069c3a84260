//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions only ever include the invoking user's own active categories.

use crate::{
    bot::{BotData, current_session},
    core::category,
    entities::category as category_entity,
    errors::Error,
};

/// Discord shows at most this many suggestions.
const MAX_SUGGESTIONS: usize = 25;

/// Names from `categories` containing `partial`, ignoring case, sorted alphabetically.
#[must_use]
pub fn matching_category_names(categories: Vec<category_entity::Model>, partial: &str) -> Vec<String> {
    let partial_lower = partial.trim().to_lowercase();

    let mut matching: Vec<String> = categories
        .into_iter()
        .filter(|c| c.name.to_lowercase().contains(&partial_lower))
        .map(|c| c.name)
        .collect();

    // Sort alphabetically for consistent UX
    matching.sort_by_key(|name| name.to_lowercase());
    matching.truncate(MAX_SUGGESTIONS);
    matching
}

/// Provides autocomplete suggestions for the caller's active category names.
///
/// Unregistered users and database failures yield no suggestions.
pub async fn autocomplete_category_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(session) = current_session(ctx).await else {
        return Vec::new();
    };
    let Ok(categories) = category::list_active_categories(&ctx.data().database, &session).await
    else {
        return Vec::new();
    };
    matching_category_names(categories, partial)
}
