//! Change notifications for the presentation layer.
//!
//! Mutations are announced on a [`ChangeFeed`]; listeners subscribe and decide on
//! their own what to re-read. Nothing in the core waits on a listener.

use tokio::sync::broadcast;
use tracing::trace;

/// Buffered events per subscriber before the slowest one starts lagging.
const FEED_CAPACITY: usize = 256;

/// Something in a user's budget changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetEvent {
    /// A category was added, edited, deactivated, or removed
    CategoryChanged {
        /// Owner of the category
        user_id: String,
        /// Affected category
        category_id: i64,
    },
    /// A paycheck and its allocations were written
    PaycheckCreated {
        /// Owner of the paycheck
        user_id: String,
        /// New paycheck
        paycheck_id: i64,
    },
    /// A paycheck's date or description changed
    PaycheckUpdated {
        /// Owner of the paycheck
        user_id: String,
        /// Edited paycheck
        paycheck_id: i64,
    },
    /// A paycheck and its allocations were removed
    PaycheckDeleted {
        /// Owner of the paycheck
        user_id: String,
        /// Removed paycheck
        paycheck_id: i64,
    },
    /// An expense was recorded
    TransactionRecorded {
        /// Owner of the transaction
        user_id: String,
        /// New transaction
        transaction_id: i64,
    },
    /// An expense was removed
    TransactionDeleted {
        /// Owner of the transaction
        user_id: String,
        /// Removed transaction
        transaction_id: i64,
    },
}

impl BudgetEvent {
    /// User whose data changed.
    #[must_use]
    pub fn user_id(&self) -> &str {
        match self {
            Self::CategoryChanged { user_id, .. }
            | Self::PaycheckCreated { user_id, .. }
            | Self::PaycheckUpdated { user_id, .. }
            | Self::PaycheckDeleted { user_id, .. }
            | Self::TransactionRecorded { user_id, .. }
            | Self::TransactionDeleted { user_id, .. } => user_id,
        }
    }
}

/// Cloneable publish/subscribe handle.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<BudgetEvent>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed {
    /// Creates a feed with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self { sender }
    }

    /// Registers a new listener. It only sees events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BudgetEvent> {
        self.sender.subscribe()
    }

    /// Announces a change. Returns the number of listeners that will see it.
    pub fn publish(&self, event: BudgetEvent) -> usize {
        trace!("Publishing {event:?}");
        // No subscribers is not an error: nobody is watching yet.
        self.sender.send(event).unwrap_or(0)
    }
}
