//! Per-user queue of pushed messages.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::UserId;
use crate::message::OutboundMessage;
use crate::monitor::Notifier;

/// Oldest messages are dropped once a user has this many undelivered.
pub const MAX_PENDING: usize = 100;

/// Holds notifications until the user's client collects them.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    pending: Arc<Mutex<HashMap<UserId, VecDeque<OutboundMessage>>>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending message for `user`, oldest first.
    pub async fn drain(&self, user: UserId) -> Vec<OutboundMessage> {
        self.pending
            .lock()
            .await
            .remove(&user)
            .map(Vec::from)
            .unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for Outbox {
    async fn notify(&self, user: UserId, message: OutboundMessage) {
        let mut pending = self.pending.lock().await;
        let queue = pending.entry(user).or_default();
        if queue.len() >= MAX_PENDING {
            warn!(%user, "outbox full; dropping oldest notification");
            queue.pop_front();
        }
        queue.push_back(message);
        debug!(%user, pending = queue.len(), "queued notification");
    }
}
