//! Per-user session storage.
//!
//! Sessions live in a moka cache keyed by user. Each value is its own
//! mutex, so users never contend with each other. A session nobody has
//! touched for the idle timeout is evicted; the user's next event starts
//! from a fresh `Idle` session.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tokio::sync::Mutex;

use crate::domain::UserId;

use super::state::Session;

/// Shared handle to one user's session.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Configuration for the session store.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Evict sessions untouched for this long.
    pub idle_timeout: Duration,

    /// Maximum number of live sessions.
    pub max_capacity: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(30 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Keyed map of user sessions with idle eviction.
#[derive(Clone)]
pub struct SessionStore {
    sessions: MokaCache<UserId, SessionHandle>,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        let sessions = MokaCache::builder()
            .time_to_idle(config.idle_timeout)
            .max_capacity(config.max_capacity)
            .build();

        Self { sessions }
    }

    /// The user's session, created on first use.
    pub async fn get(&self, user: UserId) -> SessionHandle {
        self.sessions
            .get_with(user, async { Arc::new(Mutex::new(Session::default())) })
            .await
    }

    /// A copy of the user's session, if one exists. Does not create one.
    pub async fn snapshot(&self, user: UserId) -> Option<Session> {
        let handle = self.sessions.get(&user).await?;
        let session = handle.lock().await;
        Some(session.clone())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}
