//! The conversation controller.
//!
//! Applies the pure [`transition`] to a user's session and performs the
//! resulting effect. The session lock is released while the railway API is
//! being called; when the call returns, the session's generation tells us
//! whether the user restarted in the meantime.

use std::collections::HashSet;
use std::fmt::Write;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::domain::{
    AvailabilityResult, CityDirectory, DateWindow, SearchQuery, UserId, to_wire,
};
use crate::format::{FETCH_FAILED, no_trains_message, results_message};
use crate::message::OutboundMessage;
use crate::monitor::{CheckInterval, MonitorId, MonitorRegistry};
use crate::railway::{AvailabilitySource, FetchError};

use super::event::Event;
use super::keyboards;
use super::sessions::SessionStore;
use super::state::Step;
use super::transition::{DialogContext, Effect, transition};

/// Reply when a lookup finishes after the user already started over.
pub const SEARCH_SUPERSEDED: &str =
    "That search was cancelled because you started a new one.";

const NO_MONITORS: &str = "You have no active monitors.\n\n\
    Search for trains and click 'Monitor this route' to start monitoring.";

/// Drives every user's conversation.
pub struct Controller {
    cities: CityDirectory,
    source: Arc<dyn AvailabilitySource>,
    sessions: SessionStore,
    monitors: MonitorRegistry,
    clock: Arc<dyn Clock>,
}

impl Controller {
    pub fn new(
        source: Arc<dyn AvailabilitySource>,
        monitors: MonitorRegistry,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cities: CityDirectory::builtin(),
            source,
            sessions: SessionStore::default(),
            monitors,
            clock,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn monitors(&self) -> &MonitorRegistry {
        &self.monitors
    }

    /// Handle one event and produce exactly one reply.
    pub async fn advance(&self, user: UserId, event: Event) -> OutboundMessage {
        debug!(%user, event = event.kind(), "received event");

        if event.is_monitor_management() {
            return self.manage_monitors(user, event).await;
        }

        let handle = self.sessions.get(user).await;
        let mut session = handle.lock().await;

        let ctx = DialogContext {
            cities: self.cities,
            window: DateWindow::starting(self.clock.today()),
            last_search: session.last_search,
        };

        let accepted = match transition(&session.step, &event, &ctx) {
            Ok(t) => t,
            Err(rejection) => {
                debug!(
                    %user,
                    step = session.step.name(),
                    error = ?rejection.error,
                    "event rejected"
                );
                return rejection.reprompt;
            }
        };

        if accepted.restarted {
            session.reset();
        }
        debug!(%user, from = session.step.name(), to = accepted.next.name(), "step");
        session.step = accepted.next;

        match accepted.effect {
            Effect::Reply(message) => message,
            Effect::Fetch(query) => {
                let generation = session.generation;
                drop(session);

                let outcome = self.fetch(&query).await;

                let mut session = handle.lock().await;
                if session.generation != generation {
                    warn!(%user, "discarding result of abandoned search");
                    return OutboundMessage::text(SEARCH_SUPERSEDED);
                }

                session.step = Step::Idle;
                match outcome {
                    Ok(result) => {
                        session.last_search = Some(query);
                        OutboundMessage::with_keyboard(
                            results_message(&query, &result),
                            keyboards::result_actions(),
                        )
                    }
                    Err(FetchError::EmptyResult) => {
                        OutboundMessage::text(no_trains_message(&query))
                    }
                    Err(e) => {
                        warn!(%user, error = %e, "availability lookup failed");
                        OutboundMessage::text(FETCH_FAILED)
                    }
                }
            }
            Effect::CreateMonitor { query, interval } => {
                session.last_search = None;
                drop(session);
                self.create_monitor(user, query, interval).await
            }
        }
    }

    async fn fetch(
        &self,
        query: &SearchQuery,
    ) -> Result<AvailabilityResult, FetchError> {
        info!(
            from = %query.origin.station_code,
            to = %query.destination.station_code,
            date = %query.date,
            "searching availability"
        );
        self.source
            .fetch(
                query.origin.station_code,
                query.destination.station_code,
                query.date,
            )
            .await
    }

    async fn create_monitor(
        &self,
        user: UserId,
        query: SearchQuery,
        interval: CheckInterval,
    ) -> OutboundMessage {
        // Seed with what is listed now so only later arrivals are reported.
        let known: HashSet<String> = match self.fetch(&query).await {
            Ok(result) => result.train_numbers().map(str::to_string).collect(),
            Err(FetchError::EmptyResult) => HashSet::new(),
            Err(e) => {
                warn!(%user, error = %e, "could not seed monitor; starting empty");
                HashSet::new()
            }
        };

        self.monitors
            .add(user, query, interval, known, self.clock.now())
            .await;

        OutboundMessage::text(format!(
            "✅ Monitor created!\n\n\
             Route: {} → {}\n\
             Date: {}\n\
             Check interval: Every {} minute(s)\n\n\
             You'll be notified when new trains become available.\n\
             Use /monitors to manage your active monitors.",
            query.origin.display_name,
            query.destination.display_name,
            to_wire(query.date),
            interval.minutes(),
        ))
    }

    /// Monitor commands work from any step and leave the session alone.
    async fn manage_monitors(&self, user: UserId, event: Event) -> OutboundMessage {
        match event {
            Event::StopMonitor(id) => self.stop_monitor(user, MonitorId(id)).await,
            Event::StopAllMonitors => self.stop_all_monitors(user).await,
            // ListMonitors
            _ => self.list_monitors(user).await,
        }
    }

    async fn list_monitors(&self, user: UserId) -> OutboundMessage {
        let monitors = self.monitors.list_for_user(user).await;
        if monitors.is_empty() {
            return OutboundMessage::text(NO_MONITORS);
        }

        let mut text = String::from("📡 Your active monitors:\n\n");
        for m in &monitors {
            let _ = write!(
                text,
                "🚆 {} → {}\n   Date: {}\n   Interval: Every {} min\n   ID: {}\n\n",
                m.query.origin.display_name,
                m.query.destination.display_name,
                to_wire(m.query.date),
                m.interval.minutes(),
                m.id,
            );
        }

        OutboundMessage::with_keyboard(text.trim_end(), keyboards::monitor_controls(&monitors))
    }

    async fn stop_monitor(&self, user: UserId, id: MonitorId) -> OutboundMessage {
        if !self.monitors.stop(user, id).await {
            return OutboundMessage::text(format!("Monitor {id} was not found."));
        }

        if self.monitors.list_for_user(user).await.is_empty() {
            OutboundMessage::text("All monitors stopped.")
        } else {
            self.list_monitors(user).await
        }
    }

    async fn stop_all_monitors(&self, user: UserId) -> OutboundMessage {
        self.monitors.stop_all_for_user(user).await;
        OutboundMessage::text("✅ All monitors stopped.")
    }
}
