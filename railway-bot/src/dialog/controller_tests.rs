//! End-to-end conversation tests against a fake availability source.

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeDelta};
use tokio::sync::Notify;

use super::*;
use crate::clock::FixedClock;
use crate::domain::{
    AvailabilityResult, CarOffering, SeatBreakdown, StationCode, Train, UserId, to_wire,
};
use crate::format::{FETCH_FAILED, NO_TRAINS_FOUND};
use crate::monitor::MonitorRegistry;
use crate::railway::{AvailabilitySource, FetchError};

type Call = (StationCode, StationCode, NaiveDate);
type Respond = Box<dyn Fn() -> Result<AvailabilityResult, FetchError> + Send + Sync>;

/// Records every lookup and answers with a canned response.
struct RecordingSource {
    calls: Mutex<Vec<Call>>,
    respond: Respond,
}

impl RecordingSource {
    fn new(respond: impl Fn() -> Result<AvailabilityResult, FetchError> + Send + Sync + 'static) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    fn empty() -> Self {
        Self::new(|| Err(FetchError::EmptyResult))
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AvailabilitySource for RecordingSource {
    async fn fetch(
        &self,
        origin: StationCode,
        destination: StationCode,
        date: NaiveDate,
    ) -> Result<AvailabilityResult, FetchError> {
        self.calls.lock().unwrap().push((origin, destination, date));
        (self.respond)()
    }
}

/// Blocks each lookup until the test releases it.
#[derive(Default)]
struct GatedSource {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl AvailabilitySource for GatedSource {
    async fn fetch(
        &self,
        _origin: StationCode,
        _destination: StationCode,
        _date: NaiveDate,
    ) -> Result<AvailabilityResult, FetchError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(AvailabilityResult::new(vec![train("710Ф")]))
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn code(s: &str) -> StationCode {
    StationCode::parse(s).unwrap()
}

fn train(number: &str) -> Train {
    Train {
        number: number.to_string(),
        brand: "Afrosiyob".to_string(),
        departure_date: "22.10.2026".to_string(),
        departure_time: "08:00".to_string(),
        arrival_date: "22.10.2026".to_string(),
        arrival_time: "10:10".to_string(),
        duration: "02:10".to_string(),
        route_from: "ТАШКЕНТ".to_string(),
        route_to: "САМАРКАНД".to_string(),
        cars: vec![CarOffering {
            car_type: "Бизнес".to_string(),
            free_seats: 4,
            seats: SeatBreakdown {
                undefined: 4,
                ..Default::default()
            },
            tariff: 250_000,
            commission_fee: 5_000,
        }],
    }
}

fn controller(source: Arc<dyn AvailabilitySource>) -> Controller {
    Controller::new(
        source,
        MonitorRegistry::new(),
        Arc::new(FixedClock::at_date(today())),
    )
}

fn city(s: &str) -> Event {
    Event::from_button(&format!("city_{s}"))
}

fn date(d: NaiveDate) -> Event {
    Event::from_button(&format!("date_{}", to_wire(d)))
}

async fn step_of(c: &Controller, user: UserId) -> Step {
    c.sessions().snapshot(user).await.unwrap_or_default().step
}

const ALICE: UserId = UserId(42);

#[tokio::test]
async fn tashkent_to_samarkand_with_no_trains() {
    let source = Arc::new(RecordingSource::empty());
    let c = controller(source.clone());
    let travel = today() + TimeDelta::days(3);

    let reply = c.advance(ALICE, Event::from_command("/start")).await;
    assert!(reply.has_button("city_2900000"));

    let reply = c.advance(ALICE, city("2900000")).await;
    assert!(!reply.has_button("city_2900000"));

    let reply = c.advance(ALICE, city("2900700")).await;
    assert!(reply.text.contains("Toshkent → Samarqand"));
    assert_eq!(reply.keyboard.buttons().count(), 14);

    let reply = c.advance(ALICE, date(travel)).await;
    assert!(reply.text.contains(NO_TRAINS_FOUND), "{}", reply.text);
    assert!(reply.text.contains("ТАШКЕНТ → САМАРКАНД"));

    assert_eq!(source.calls(), vec![(code("2900000"), code("2900700"), travel)]);
    assert_eq!(step_of(&c, ALICE).await, Step::Idle);
}

#[tokio::test]
async fn results_offer_monitoring() {
    let source = Arc::new(RecordingSource::new(|| {
        Ok(AvailabilityResult::new(vec![train("764Ф"), train("710Ф")]))
    }));
    let c = controller(source.clone());

    c.advance(ALICE, Event::Start).await;
    c.advance(ALICE, city("2900000")).await;
    c.advance(ALICE, city("2900700")).await;
    let reply = c.advance(ALICE, date(today())).await;

    assert!(reply.text.starts_with("🚆 TRAIN SEARCH RESULTS"));
    assert!(reply.text.contains("Found 2 train(s)"));
    let first = reply.text.find("764Ф").unwrap();
    let second = reply.text.find("710Ф").unwrap();
    assert!(first < second, "API order must be kept");
    assert!(reply.has_button("setup_monitor"));
    assert!(reply.has_button("restart"));

    let reply = c.advance(ALICE, Event::from_button("setup_monitor")).await;
    assert!(reply.has_button("interval_5"));

    let reply = c.advance(ALICE, Event::from_button("interval_5")).await;
    assert!(reply.text.starts_with("✅ Monitor created!"));
    assert!(reply.text.contains("Every 5 minute(s)"));

    // Seeding the monitor looked the route up again.
    assert_eq!(source.calls().len(), 2);
    let monitors = c.monitors().list_for_user(ALICE).await;
    assert_eq!(monitors.len(), 1);
    assert!(monitors[0].known_trains.contains("764Ф"));

    let reply = c.advance(ALICE, Event::from_command("/monitors")).await;
    assert!(reply.text.contains("Toshkent → Samarqand"));
    let stop = format!("stop_monitor_{}", monitors[0].id);
    assert!(reply.has_button(&stop));
    assert!(reply.has_button("stop_all_monitors"));

    let reply = c.advance(ALICE, Event::from_button(&stop)).await;
    assert_eq!(reply.text, "All monitors stopped.");
    assert!(c.monitors().is_empty().await);
}

#[tokio::test]
async fn monitoring_needs_a_successful_search() {
    let source = Arc::new(RecordingSource::empty());
    let c = controller(source);

    c.advance(ALICE, Event::Start).await;
    c.advance(ALICE, city("2900000")).await;
    c.advance(ALICE, city("2900700")).await;
    c.advance(ALICE, date(today())).await;

    let reply = c.advance(ALICE, Event::from_button("setup_monitor")).await;
    assert!(reply.text.starts_with("⚠️"));
    assert_eq!(step_of(&c, ALICE).await, Step::Idle);
}

#[tokio::test]
async fn fetch_failure_is_reported_and_resets() {
    let source = Arc::new(RecordingSource::new(|| Err(FetchError::Rejected)));
    let c = controller(source);

    c.advance(ALICE, Event::Start).await;
    c.advance(ALICE, city("2900800")).await;
    c.advance(ALICE, city("2900000")).await;
    let reply = c.advance(ALICE, date(today())).await;

    assert_eq!(reply.text, FETCH_FAILED);
    assert_eq!(step_of(&c, ALICE).await, Step::Idle);
}

#[tokio::test]
async fn city_before_start_is_rejected() {
    let source = Arc::new(RecordingSource::empty());
    let c = controller(source.clone());

    let reply = c.advance(ALICE, city("2900700")).await;
    assert!(reply.text.contains("That option is not available right now."));
    assert!(reply.text.contains("/start"));
    assert_eq!(step_of(&c, ALICE).await, Step::Idle);

    let reply = c.advance(ALICE, date(today())).await;
    assert!(reply.text.starts_with("⚠️"));
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn date_outside_window_keeps_date_step() {
    let source = Arc::new(RecordingSource::empty());
    let c = controller(source.clone());

    c.advance(ALICE, Event::Start).await;
    c.advance(ALICE, city("2900000")).await;
    c.advance(ALICE, city("2900700")).await;
    let before = step_of(&c, ALICE).await;

    let reply = c.advance(ALICE, date(today() + TimeDelta::days(14))).await;
    assert!(reply.text.contains("Please choose a date from the list."));
    assert_eq!(step_of(&c, ALICE).await, before);

    let reply = c
        .advance(ALICE, Event::DateSelected("31.02.2026".to_string()))
        .await;
    assert!(reply.text.starts_with("⚠️"));
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn restart_clears_selections() {
    let c = controller(Arc::new(RecordingSource::empty()));

    c.advance(ALICE, Event::Start).await;
    c.advance(ALICE, city("2900000")).await;
    c.advance(ALICE, city("2900700")).await;
    let generation = c.sessions().snapshot(ALICE).await.unwrap().generation;

    let reply = c.advance(ALICE, Event::from_button("restart")).await;
    assert!(reply.text.contains("Please select your departure city:"));

    let session = c.sessions().snapshot(ALICE).await.unwrap();
    assert_eq!(session.step, Step::AwaitingOrigin);
    assert_eq!(session.generation, generation + 1);
    assert_eq!(session.last_search, None);
}

#[tokio::test]
async fn restart_during_lookup_discards_late_result() {
    let source = Arc::new(GatedSource::default());
    let c = Arc::new(controller(source.clone()));

    c.advance(ALICE, Event::Start).await;
    c.advance(ALICE, city("2900000")).await;
    c.advance(ALICE, city("2900700")).await;

    let pending = {
        let c = c.clone();
        tokio::spawn(async move { c.advance(ALICE, date(today())).await })
    };
    source.entered.notified().await;

    // The session is not locked while the lookup runs.
    let reply = c.advance(ALICE, Event::Restart).await;
    assert!(reply.has_button("city_2900000"));

    source.release.notify_one();
    let late = pending.await.unwrap();
    assert_eq!(late.text, SEARCH_SUPERSEDED);

    let session = c.sessions().snapshot(ALICE).await.unwrap();
    assert_eq!(session.step, Step::AwaitingOrigin);
    assert_eq!(session.last_search, None);
}

#[tokio::test]
async fn second_date_while_searching_is_rejected() {
    let source = Arc::new(GatedSource::default());
    let c = Arc::new(controller(source.clone()));

    c.advance(ALICE, Event::Start).await;
    c.advance(ALICE, city("2900000")).await;
    c.advance(ALICE, city("2900700")).await;

    let pending = {
        let c = c.clone();
        tokio::spawn(async move { c.advance(ALICE, date(today())).await })
    };
    source.entered.notified().await;

    let reply = c.advance(ALICE, date(today())).await;
    assert!(reply.text.contains("Still searching"));

    source.release.notify_one();
    let reply = pending.await.unwrap();
    assert!(reply.text.starts_with("🚆 TRAIN SEARCH RESULTS"));
}

#[tokio::test]
async fn users_do_not_share_state() {
    let c = controller(Arc::new(RecordingSource::empty()));
    let bob = UserId(7);

    c.advance(ALICE, Event::Start).await;
    c.advance(ALICE, city("2900000")).await;

    let reply = c.advance(bob, city("2900700")).await;
    assert!(reply.text.starts_with("⚠️"));
    assert_eq!(step_of(&c, bob).await, Step::Idle);
    assert_eq!(
        step_of(&c, ALICE).await.origin().map(|o| o.station_code),
        Some(code("2900000"))
    );
}

#[tokio::test]
async fn stopping_unknown_monitor_fails() {
    let c = controller(Arc::new(RecordingSource::empty()));
    let reply = c.advance(ALICE, Event::from_button("stop_monitor_99")).await;
    assert_eq!(reply.text, "Monitor 99 was not found.");

    let reply = c.advance(ALICE, Event::from_command("/monitors")).await;
    assert!(reply.text.starts_with("You have no active monitors."));
    assert!(reply.keyboard.is_empty());
}

#[tokio::test]
async fn monitor_commands_leave_dialog_untouched() {
    let c = controller(Arc::new(RecordingSource::empty()));

    c.advance(ALICE, Event::Start).await;
    c.advance(ALICE, city("2900000")).await;
    let before = c.sessions().snapshot(ALICE).await.unwrap();

    c.advance(ALICE, Event::from_command("/monitors")).await;
    let reply = c.advance(ALICE, Event::from_button("stop_all_monitors")).await;
    assert_eq!(reply.text, "✅ All monitors stopped.");

    let after = c.sessions().snapshot(ALICE).await.unwrap();
    assert_eq!(after.step, before.step);
    assert_eq!(after.generation, before.generation);
}
