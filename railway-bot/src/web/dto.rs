//! Data transfer objects for the chat endpoints.

use serde::{Deserialize, Serialize};

use crate::dialog::Event;
use crate::message::OutboundMessage;

/// Something a user did in the chat client.
///
/// ```json
/// {"type": "command", "text": "/start"}
/// {"type": "button", "data": "city_2900000"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundUpdate {
    /// A typed message.
    Command { text: String },
    /// A tapped inline button.
    Button { data: String },
}

impl InboundUpdate {
    /// Whether the update carries any content at all.
    pub fn is_blank(&self) -> bool {
        match self {
            InboundUpdate::Command { text } => text.trim().is_empty(),
            InboundUpdate::Button { data } => data.is_empty(),
        }
    }

    pub fn into_event(self) -> Event {
        match self {
            InboundUpdate::Command { text } => Event::from_command(&text),
            InboundUpdate::Button { data } => Event::from_button(&data),
        }
    }
}

/// Messages pushed to a user since they last asked.
#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub messages: Vec<OutboundMessage>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
