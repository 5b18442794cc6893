//! Pure step transitions.
//!
//! Given the current step, an event and some read-only context, decide the
//! next step and what the controller should do about it. No I/O happens
//! here; the controller performs the [`Effect`].

use crate::domain::{City, CityDirectory, DateWindow, SearchQuery, StationCode};
use crate::message::OutboundMessage;
use crate::monitor::CheckInterval;

use super::error::DialogError;
use super::event::Event;
use super::keyboards;
use super::state::Step;

const WELCOME: &str = "Assalomu alaykum! 🚆\n\n\
    I can help you find available trains in Uzbekistan.\n\n\
    Please select your departure city:";

/// Read-only inputs to a transition.
#[derive(Debug, Clone, Copy)]
pub struct DialogContext {
    pub cities: CityDirectory,
    pub window: DateWindow,
    pub last_search: Option<SearchQuery>,
}

/// Work the controller must do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send this message; nothing else.
    Reply(OutboundMessage),
    /// Look up availability, then reply with the outcome.
    Fetch(SearchQuery),
    /// Register a monitor, then confirm it.
    CreateMonitor {
        query: SearchQuery,
        interval: CheckInterval,
    },
}

/// An accepted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: Step,
    pub effect: Effect,
    /// The event started a new search; selections and the previous search
    /// are forgotten.
    pub restarted: bool,
}

impl Transition {
    fn reply(next: Step, message: OutboundMessage) -> Self {
        Self {
            next,
            effect: Effect::Reply(message),
            restarted: false,
        }
    }
}

/// A rejected event. The step does not change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub error: DialogError,
    /// The prompt for the current step, prefixed with the reason.
    pub reprompt: OutboundMessage,
}

impl Rejection {
    fn new(error: DialogError, step: &Step, ctx: &DialogContext) -> Self {
        let prompt = prompt_for(step, ctx);
        Self {
            reprompt: OutboundMessage::with_keyboard(
                format!("⚠️ {error}\n\n{}", prompt.text),
                prompt.keyboard,
            ),
            error,
        }
    }
}

/// Advance the conversation.
///
/// Start and restart are accepted from every step. Monitor list and stop
/// events are not part of the search flow and are rejected here; the
/// controller answers them before calling this.
pub fn transition(
    step: &Step,
    event: &Event,
    ctx: &DialogContext,
) -> Result<Transition, Rejection> {
    let reject = |error| Err(Rejection::new(error, step, ctx));

    match (step, event) {
        (_, Event::Start | Event::Restart) => Ok(Transition {
            next: Step::AwaitingOrigin,
            effect: Effect::Reply(prompt_for(&Step::AwaitingOrigin, ctx)),
            restarted: true,
        }),

        (Step::AwaitingOrigin, Event::CitySelected(code)) => {
            let Some(origin) = lookup_city(ctx, code) else {
                return reject(DialogError::UnknownCity);
            };
            let next = Step::AwaitingDestination { origin };
            Ok(Transition::reply(next, prompt_for(&next, ctx)))
        }

        (Step::AwaitingDestination { origin }, Event::CitySelected(code)) => {
            let destination = match lookup_city(ctx, code) {
                Some(city) if city.station_code != origin.station_code => city,
                _ => return reject(DialogError::UnknownCity),
            };
            let next = Step::AwaitingDate {
                origin: *origin,
                destination,
            };
            Ok(Transition::reply(next, prompt_for(&next, ctx)))
        }

        (
            Step::AwaitingDate {
                origin,
                destination,
            },
            Event::DateSelected(text),
        ) => match ctx.window.validate(text) {
            Ok(date) => {
                let query = SearchQuery::new(*origin, *destination, date);
                Ok(Transition {
                    next: Step::Completed { query },
                    effect: Effect::Fetch(query),
                    restarted: false,
                })
            }
            Err(e) => reject(DialogError::InvalidDate(e)),
        },

        (Step::Idle | Step::AwaitingInterval { .. }, Event::MonitorRequested) => {
            match ctx.last_search {
                Some(query) => {
                    let next = Step::AwaitingInterval { query };
                    Ok(Transition::reply(next, prompt_for(&next, ctx)))
                }
                None => reject(DialogError::InvalidSequence),
            }
        }

        (Step::AwaitingInterval { query }, Event::IntervalSelected(minutes)) => {
            match CheckInterval::from_minutes(*minutes) {
                Some(interval) => Ok(Transition {
                    next: Step::Idle,
                    effect: Effect::CreateMonitor {
                        query: *query,
                        interval,
                    },
                    restarted: false,
                }),
                None => reject(DialogError::InvalidInterval(*minutes)),
            }
        }

        _ => reject(DialogError::InvalidSequence),
    }
}

fn lookup_city(ctx: &DialogContext, code: &str) -> Option<&'static City> {
    let code = StationCode::parse(code).ok()?;
    ctx.cities.by_code(code)
}

/// The message that asks for whatever `step` is waiting on.
pub fn prompt_for(step: &Step, ctx: &DialogContext) -> OutboundMessage {
    match step {
        Step::Idle => OutboundMessage::text("Use /start to search for trains."),
        Step::AwaitingOrigin => {
            OutboundMessage::with_keyboard(WELCOME, keyboards::cities(ctx.cities.all()))
        }
        Step::AwaitingDestination { origin } => OutboundMessage::with_keyboard(
            format!(
                "Departure: {}\n\nNow select your destination city:",
                origin.display_name
            ),
            keyboards::cities(ctx.cities.all_except(origin.station_code)),
        ),
        Step::AwaitingDate {
            origin,
            destination,
        } => OutboundMessage::with_keyboard(
            format!(
                "Route: {} → {}\n\nSelect travel date:",
                origin.display_name, destination.display_name
            ),
            keyboards::dates(ctx.window),
        ),
        Step::Completed { .. } => OutboundMessage::text(
            "Still searching for trains, please wait. Use /restart to start over.",
        ),
        Step::AwaitingInterval { .. } => OutboundMessage::with_keyboard(
            "Select how often to check for new trains:",
            keyboards::intervals(),
        ),
    }
}
