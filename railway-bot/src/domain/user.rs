//! Chat user identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a chat user, as assigned by the chat platform.
///
/// Conversation state and monitors are partitioned by this id; nothing is
/// ever shared between two users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
