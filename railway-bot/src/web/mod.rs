//! Web layer standing in for the chat platform.
//!
//! A chat client posts user events and receives the bot's reply; pushed
//! notifications wait in an outbox until the client collects them.

mod dto;
mod outbox;
mod routes;
mod state;

pub use dto::*;
pub use outbox::{MAX_PENDING, Outbox};
pub use routes::{AppError, create_router};
pub use state::AppState;
