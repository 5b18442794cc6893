//! In-memory monitor storage.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{NaiveDate, NaiveDateTime};
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::{SearchQuery, UserId};

use super::{CheckInterval, Monitor, MonitorId};

/// Thread-safe set of active monitors.
///
/// Cloning is cheap and every clone sees the same monitors.
#[derive(Debug, Clone, Default)]
pub struct MonitorRegistry {
    inner: Arc<RwLock<HashMap<MonitorId, Monitor>>>,
    next_id: Arc<AtomicU64>,
}

impl MonitorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching a route, seeded with the trains already listed.
    pub async fn add(
        &self,
        user: UserId,
        query: SearchQuery,
        interval: CheckInterval,
        known_trains: HashSet<String>,
        now: NaiveDateTime,
    ) -> MonitorId {
        let id = MonitorId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let monitor = Monitor {
            id,
            user,
            query,
            interval,
            known_trains,
            last_check: Some(now),
            created_at: now,
        };

        self.inner.write().await.insert(id, monitor);
        info!(%user, monitor = %id, "monitor added");
        id
    }

    /// A user's monitors, newest first.
    pub async fn list_for_user(&self, user: UserId) -> Vec<Monitor> {
        let guard = self.inner.read().await;
        let mut monitors: Vec<_> = guard.values().filter(|m| m.user == user).cloned().collect();
        monitors.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        monitors
    }

    /// Stop one monitor. Only its owner may stop it.
    ///
    /// Returns whether a monitor was removed.
    pub async fn stop(&self, user: UserId, id: MonitorId) -> bool {
        let mut guard = self.inner.write().await;
        if guard.get(&id).is_some_and(|m| m.user == user) {
            guard.remove(&id);
            info!(%user, monitor = %id, "monitor stopped");
            true
        } else {
            false
        }
    }

    /// Stop every monitor a user owns. Returns how many were removed.
    pub async fn stop_all_for_user(&self, user: UserId) -> usize {
        let mut guard = self.inner.write().await;
        let before = guard.len();
        guard.retain(|_, m| m.user != user);
        let removed = before - guard.len();
        info!(%user, removed, "stopped all monitors");
        removed
    }

    /// Drop monitors whose travel date has passed.
    pub async fn remove_expired(&self, today: NaiveDate) -> usize {
        let mut guard = self.inner.write().await;
        let before = guard.len();
        guard.retain(|_, m| m.query.date >= today);
        let removed = before - guard.len();
        if removed > 0 {
            info!(removed, "cleaned up expired monitors");
        }
        removed
    }

    /// Snapshot of the monitors due for a check at `now`.
    pub async fn due(&self, now: NaiveDateTime) -> Vec<Monitor> {
        let guard = self.inner.read().await;
        guard.values().filter(|m| m.is_due(now)).cloned().collect()
    }

    /// Record a successful check and return the train numbers not seen at
    /// the previous one.
    ///
    /// The known set becomes exactly `current`, so a train that disappears
    /// and later comes back is reported again. Returns `None` if the monitor
    /// was stopped while the check was running.
    pub async fn record_check(
        &self,
        id: MonitorId,
        current: HashSet<String>,
        now: NaiveDateTime,
    ) -> Option<HashSet<String>> {
        let mut guard = self.inner.write().await;
        let monitor = guard.get_mut(&id)?;

        let new: HashSet<String> = current.difference(&monitor.known_trains).cloned().collect();
        monitor.known_trains = current;
        monitor.last_check = Some(now);
        Some(new)
    }

    /// Record a failed check so the monitor waits a full interval before
    /// trying again.
    pub async fn touch(&self, id: MonitorId, now: NaiveDateTime) {
        if let Some(monitor) = self.inner.write().await.get_mut(&id) {
            monitor.last_check = Some(now);
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::domain::{CityDirectory, StationCode};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn query(date: NaiveDate) -> SearchQuery {
        let dir = CityDirectory::builtin();
        SearchQuery::new(
            dir.by_code(StationCode::parse("2900000").unwrap()).unwrap(),
            dir.by_code(StationCode::parse("2900800").unwrap()).unwrap(),
            date,
        )
    }

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn add_and_list_newest_first() {
        let reg = MonitorRegistry::new();
        let alice = UserId(1);
        let bob = UserId(2);

        let first = reg
            .add(alice, query(now().date()), CheckInterval::OneMinute, set(&[]), now())
            .await;
        let second = reg
            .add(
                alice,
                query(now().date()),
                CheckInterval::FiveMinutes,
                set(&[]),
                now() + TimeDelta::seconds(1),
            )
            .await;
        reg.add(bob, query(now().date()), CheckInterval::OneMinute, set(&[]), now())
            .await;

        let ids: Vec<_> = reg.list_for_user(alice).await.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![second, first]);
        assert_eq!(reg.len().await, 3);
    }

    #[tokio::test]
    async fn only_owner_can_stop() {
        let reg = MonitorRegistry::new();
        let id = reg
            .add(UserId(1), query(now().date()), CheckInterval::OneMinute, set(&[]), now())
            .await;

        assert!(!reg.stop(UserId(2), id).await);
        assert!(reg.stop(UserId(1), id).await);
        assert!(!reg.stop(UserId(1), id).await);
        assert!(reg.is_empty().await);
    }

    #[tokio::test]
    async fn stop_all_leaves_other_users() {
        let reg = MonitorRegistry::new();
        for _ in 0..3 {
            reg.add(UserId(1), query(now().date()), CheckInterval::OneMinute, set(&[]), now())
                .await;
        }
        reg.add(UserId(2), query(now().date()), CheckInterval::OneMinute, set(&[]), now())
            .await;

        assert_eq!(reg.stop_all_for_user(UserId(1)).await, 3);
        assert_eq!(reg.len().await, 1);
    }

    #[tokio::test]
    async fn expired_monitors_are_removed() {
        let reg = MonitorRegistry::new();
        let today = now().date();
        let yesterday = today.pred_opt().unwrap();
        reg.add(UserId(1), query(yesterday), CheckInterval::OneMinute, set(&[]), now())
            .await;
        let keep = reg
            .add(UserId(1), query(today), CheckInterval::OneMinute, set(&[]), now())
            .await;

        assert_eq!(reg.remove_expired(today).await, 1);
        let left: Vec<_> = reg.list_for_user(UserId(1)).await.iter().map(|m| m.id).collect();
        assert_eq!(left, vec![keep]);
    }

    #[tokio::test]
    async fn due_respects_interval() {
        let reg = MonitorRegistry::new();
        reg.add(UserId(1), query(now().date()), CheckInterval::FiveMinutes, set(&[]), now())
            .await;

        assert!(reg.due(now() + TimeDelta::minutes(4)).await.is_empty());
        assert_eq!(reg.due(now() + TimeDelta::minutes(5)).await.len(), 1);
    }

    #[tokio::test]
    async fn record_check_reports_only_new_trains() {
        let reg = MonitorRegistry::new();
        let id = reg
            .add(UserId(1), query(now().date()), CheckInterval::OneMinute, set(&["A", "B"]), now())
            .await;

        let later = now() + TimeDelta::minutes(1);
        let new = reg.record_check(id, set(&["B", "C"]), later).await.unwrap();
        assert_eq!(new, set(&["C"]));

        // A vanished; when it returns it is new again.
        let new = reg
            .record_check(id, set(&["A", "B", "C"]), later + TimeDelta::minutes(1))
            .await
            .unwrap();
        assert_eq!(new, set(&["A"]));

        assert!(reg.stop(UserId(1), id).await);
        assert!(reg.record_check(id, set(&["D"]), later).await.is_none());
    }
}
