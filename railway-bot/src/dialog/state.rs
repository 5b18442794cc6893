//! Conversation state.

use crate::domain::{City, SearchQuery};

/// Where a user is in the search flow.
///
/// Each variant carries exactly the selections that are valid at that
/// point, so a date without a destination cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    Idle,
    AwaitingOrigin,
    AwaitingDestination {
        origin: &'static City,
    },
    AwaitingDate {
        origin: &'static City,
        destination: &'static City,
    },
    /// Date chosen; the lookup is in flight.
    Completed {
        query: SearchQuery,
    },
    /// Choosing how often to monitor the last searched route.
    AwaitingInterval {
        query: SearchQuery,
    },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Idle => "idle",
            Step::AwaitingOrigin => "awaiting_origin",
            Step::AwaitingDestination { .. } => "awaiting_destination",
            Step::AwaitingDate { .. } => "awaiting_date",
            Step::Completed { .. } => "completed",
            Step::AwaitingInterval { .. } => "awaiting_interval",
        }
    }

    pub fn origin(&self) -> Option<&'static City> {
        match self {
            Step::AwaitingDestination { origin } | Step::AwaitingDate { origin, .. } => {
                Some(*origin)
            }
            Step::Completed { query } | Step::AwaitingInterval { query } => Some(query.origin),
            Step::Idle | Step::AwaitingOrigin => None,
        }
    }

    pub fn destination(&self) -> Option<&'static City> {
        match self {
            Step::AwaitingDate { destination, .. } => Some(*destination),
            Step::Completed { query } | Step::AwaitingInterval { query } => {
                Some(query.destination)
            }
            _ => None,
        }
    }
}

/// Per-user conversation record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub step: Step,
    /// Bumped on every start or restart. A lookup whose generation no
    /// longer matches when it returns belongs to an abandoned search.
    pub generation: u64,
    /// The last search that returned trains; offered for monitoring.
    pub last_search: Option<SearchQuery>,
}

impl Session {
    /// Forget all selections and begin a new generation.
    pub fn reset(&mut self) {
        self.step = Step::Idle;
        self.last_search = None;
        self.generation = self.generation.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::CITIES;

    #[test]
    fn selections_by_step() {
        let (a, b) = (&CITIES[0], &CITIES[1]);
        assert_eq!(Step::Idle.origin(), None);
        assert_eq!(Step::AwaitingDestination { origin: a }.origin(), Some(a));
        assert_eq!(Step::AwaitingDestination { origin: a }.destination(), None);

        let query = SearchQuery::new(a, b, NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
        assert_eq!(Step::Completed { query }.destination(), Some(b));
    }

    #[test]
    fn reset_bumps_generation() {
        let mut session = Session {
            step: Step::AwaitingOrigin,
            ..Default::default()
        };
        session.reset();
        assert_eq!(session.step, Step::Idle);
        assert_eq!(session.generation, 1);
    }
}
