//! Background loop that re-checks monitored routes.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDateTime, TimeDelta};
use futures::future::join_all;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::format::train_summary;
use crate::message::OutboundMessage;
use crate::railway::{AvailabilitySource, FetchError};

use super::{Monitor, MonitorRegistry, Notifier};

/// How often to look for due monitors.
const TICK: Duration = Duration::from_secs(30);

/// How often to drop monitors for past dates.
const CLEANUP_EVERY: TimeDelta = TimeDelta::hours(1);

/// Periodically checks due monitors and notifies users about new trains.
pub struct MonitorChecker {
    registry: MonitorRegistry,
    source: Arc<dyn AvailabilitySource>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl MonitorChecker {
    pub fn new(
        registry: MonitorRegistry,
        source: Arc<dyn AvailabilitySource>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            source,
            notifier,
            clock,
        }
    }

    /// Run forever. Failures are logged; nothing here ends the loop.
    pub async fn run(self) {
        info!(tick_secs = TICK.as_secs(), "starting monitor loop");

        let mut interval = tokio::time::interval(TICK);
        let mut last_cleanup: Option<NaiveDateTime> = None;

        loop {
            interval.tick().await;
            let now = self.clock.now();

            if last_cleanup.is_none_or(|t| now - t >= CLEANUP_EVERY) {
                self.registry.remove_expired(now.date()).await;
                last_cleanup = Some(now);
            }

            self.check_due(now).await;
        }
    }

    /// Check every monitor due at `now`, concurrently.
    ///
    /// Returns the number of notifications sent.
    pub async fn check_due(&self, now: NaiveDateTime) -> usize {
        let due = self.registry.due(now).await;
        if due.is_empty() {
            return 0;
        }

        let sent = join_all(due.iter().map(|m| self.check_one(m, now))).await;
        sent.into_iter().sum()
    }

    async fn check_one(&self, monitor: &Monitor, now: NaiveDateTime) -> usize {
        let q = &monitor.query;
        let trains = match self
            .source
            .fetch(q.origin.station_code, q.destination.station_code, q.date)
            .await
        {
            Ok(result) => result.trains,
            Err(FetchError::EmptyResult) => Vec::new(),
            Err(e) => {
                warn!(monitor = %monitor.id, error = %e, "monitor check failed");
                self.registry.touch(monitor.id, now).await;
                return 0;
            }
        };

        let current: HashSet<String> = trains.iter().map(|t| t.number.clone()).collect();
        let Some(new) = self.registry.record_check(monitor.id, current, now).await else {
            return 0;
        };

        let mut sent = 0;
        for train in trains.iter().filter(|t| new.contains(&t.number)) {
            let text = format!("🔔 New train available!\n\n{}", train_summary(train));
            self.notifier
                .notify(monitor.user, OutboundMessage::text(text))
                .await;
            info!(user = %monitor.user, train = %train.number, "sent new train notification");
            sent += 1;
        }
        sent
    }
}
