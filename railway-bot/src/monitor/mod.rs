//! Route monitors.
//!
//! After a search, a user can ask the bot to keep watching that route and
//! date. A background checker re-runs the lookup on the chosen interval and
//! notifies the user whenever a train appears that was not listed at the
//! previous check. Monitors live in memory only.

mod checker;
mod registry;

use std::collections::HashSet;
use std::fmt;

use async_trait::async_trait;
use chrono::{NaiveDateTime, TimeDelta};

use crate::domain::{SearchQuery, UserId};
use crate::message::OutboundMessage;

pub use checker::MonitorChecker;
pub use registry::MonitorRegistry;

/// How often a monitor re-checks its route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInterval {
    OneMinute,
    FiveMinutes,
    TenMinutes,
}

impl CheckInterval {
    pub const ALL: [CheckInterval; 3] = [
        CheckInterval::OneMinute,
        CheckInterval::FiveMinutes,
        CheckInterval::TenMinutes,
    ];

    /// Parse one of the offered interval lengths.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.minutes() == minutes)
    }

    pub fn minutes(self) -> u32 {
        match self {
            CheckInterval::OneMinute => 1,
            CheckInterval::FiveMinutes => 5,
            CheckInterval::TenMinutes => 10,
        }
    }

    pub fn as_delta(self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.minutes()))
    }
}

/// Registry-assigned monitor id, unique for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonitorId(pub u64);

impl fmt::Display for MonitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A watched route.
#[derive(Debug, Clone)]
pub struct Monitor {
    pub id: MonitorId,
    pub user: UserId,
    pub query: SearchQuery,
    pub interval: CheckInterval,
    /// Train numbers listed at the last successful check.
    pub known_trains: HashSet<String>,
    pub last_check: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl Monitor {
    /// Whether the interval has elapsed since the last check.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        match self.last_check {
            None => true,
            Some(last) => now - last >= self.interval.as_delta(),
        }
    }
}

/// Delivers messages the user did not directly ask for.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, user: UserId, message: OutboundMessage);
}
