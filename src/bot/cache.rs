//! Per-user dashboard cache.
//!
//! `/dashboard` fills the cache; a background listener on the [`ChangeFeed`] drops a
//! user's entry whenever something in their budget changes. If the listener falls
//! behind the feed it clears everything rather than guess what it missed.
//!
//! Each invalidation advances a per-user generation. A dashboard is only stored if
//! the generation it was built under is still current, so a change that lands while
//! a dashboard is being built cannot leave the stale result cached.

use crate::core::{
    aggregate::Dashboard,
    events::{BudgetEvent, ChangeFeed},
};
use std::{collections::HashMap, sync::Arc};
use tokio::{
    sync::{RwLock, broadcast::error::RecvError},
    task::JoinHandle,
};
use tracing::{debug, info, trace, warn};

/// Snapshot of a user's cache generation, taken before a dashboard is built.
///
/// A dashboard may only be stored if no invalidation happened since the ticket was
/// issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTicket {
    epoch: u64,
    generation: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, Dashboard>,
    /// Bumped per user on every invalidation, cached or not
    generations: HashMap<String, u64>,
    /// Bumped by `clear`
    epoch: u64,
}

impl CacheState {
    fn ticket(&self, user_id: &str) -> CacheTicket {
        CacheTicket {
            epoch: self.epoch,
            generation: self.generations.get(user_id).copied().unwrap_or(0),
        }
    }
}

/// Cached dashboards keyed by user id.
#[derive(Debug, Clone, Default)]
pub struct DashboardCache {
    state: Arc<RwLock<CacheState>>,
}

impl DashboardCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached dashboard for `user_id`, if still valid.
    pub async fn get(&self, user_id: &str) -> Option<Dashboard> {
        let hit = self.state.read().await.entries.get(user_id).cloned();
        trace!("Dashboard cache {} for {user_id}", if hit.is_some() { "hit" } else { "miss" });
        hit
    }

    /// Current generation for `user_id`. Take this before reading the database.
    pub async fn ticket(&self, user_id: &str) -> CacheTicket {
        self.state.read().await.ticket(user_id)
    }

    /// Stores a dashboard built after `ticket` was issued, unless the user's data was
    /// invalidated in between. Returns whether it was stored.
    pub async fn insert_if_current(
        &self,
        user_id: &str,
        ticket: CacheTicket,
        dashboard: Dashboard,
    ) -> bool {
        let mut state = self.state.write().await;
        if state.ticket(user_id) != ticket {
            debug!("Discarding stale dashboard for {user_id}");
            return false;
        }
        state.entries.insert(user_id.to_string(), dashboard);
        true
    }

    /// Drops one user's entry and advances their generation. Returns whether anything
    /// was cached.
    pub async fn invalidate(&self, user_id: &str) -> bool {
        let mut state = self.state.write().await;
        *state.generations.entry(user_id.to_string()).or_insert(0) += 1;
        state.entries.remove(user_id).is_some()
    }

    /// Drops every entry and invalidates every outstanding ticket.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        let count = state.entries.len();
        state.entries.clear();
        state.epoch += 1;
        info!("Dashboard cache cleared ({count} entries)");
    }

    /// Number of cached dashboards.
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    /// Listens on `feed` until it closes, invalidating entries as events arrive.
    #[must_use]
    pub fn spawn_invalidator(&self, feed: &ChangeFeed) -> JoinHandle<()> {
        let cache = self.clone();
        let mut receiver = feed.subscribe();
        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => cache.apply(&event).await,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Dashboard invalidator lagged by {skipped} events");
                        cache.clear().await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            trace!("Dashboard invalidator stopped");
        })
    }

    async fn apply(&self, event: &BudgetEvent) {
        if self.invalidate(event.user_id()).await {
            trace!("Invalidated dashboard for {} after {event:?}", event.user_id());
        }
    }
}
