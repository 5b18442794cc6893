//! Rejected events.

use thiserror::Error;

use crate::domain::DateError;

/// Why an event was not accepted in the current step.
///
/// The `Display` text is shown to the user above the re-prompt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogError {
    #[error("That option is not available right now.")]
    InvalidSequence,

    #[error("Unknown city, please choose one from the list.")]
    UnknownCity,

    #[error("Please choose a date from the list.")]
    InvalidDate(#[source] DateError),

    #[error("Please choose one of the offered intervals.")]
    InvalidInterval(u32),
}
