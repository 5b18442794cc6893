//! Conversation flow: origin, destination, date, then results.
//!
//! The flow is a small state machine. [`transition`] is pure and decides
//! what happens next; [`Controller`] owns the per-user sessions and runs the
//! side effects (the availability lookup and monitor creation).

mod controller;
mod error;
mod event;
mod keyboards;
mod sessions;
mod state;
mod transition;

#[cfg(test)]
mod controller_tests;

pub use controller::{Controller, SEARCH_SUPERSEDED};
pub use error::DialogError;
pub use event::{Event, payload};
pub use sessions::{SessionConfig, SessionHandle, SessionStore};
pub use state::{Session, Step};
pub use transition::{DialogContext, Effect, Rejection, Transition, prompt_for, transition};
