//! Travel date window.
//!
//! Users may only search the 14 calendar days starting today. Dates travel
//! over the wire (button payloads and API requests) as `dd.mm.yyyy`.

use chrono::{Days, NaiveDate};

/// Number of selectable days, today included.
pub const WINDOW_DAYS: usize = 14;

/// Wire format for dates in button payloads and API requests.
const WIRE_FORMAT: &str = "%d.%m.%Y";

/// Error returned when a date cannot be parsed or lies outside the window.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("unparseable date: {0}")]
    Unparseable(String),

    #[error("{date} is outside the window starting {start}")]
    OutOfWindow { date: NaiveDate, start: NaiveDate },
}

/// Format a date the way the API and button payloads expect.
pub fn to_wire(date: NaiveDate) -> String {
    date.format(WIRE_FORMAT).to_string()
}

/// Parse a `dd.mm.yyyy` date.
pub fn parse_wire(s: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(s.trim(), WIRE_FORMAT)
        .map_err(|_| DateError::Unparseable(s.to_string()))
}

/// The selectable dates, anchored at a particular "today".
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use railway_bot::domain::DateWindow;
///
/// let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
/// let window = DateWindow::starting(today);
/// assert_eq!(window.days().count(), 14);
/// assert_eq!(window.days().next(), Some(today));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
}

impl DateWindow {
    pub fn starting(today: NaiveDate) -> Self {
        Self { start: today }
    }

    /// The last selectable date (inclusive).
    pub fn end(&self) -> NaiveDate {
        self.start
            .checked_add_days(Days::new(WINDOW_DAYS as u64 - 1))
            .unwrap_or(NaiveDate::MAX)
    }

    /// All selectable dates in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(WINDOW_DAYS)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end()
    }

    /// Parse a wire date and check it is selectable.
    pub fn validate(&self, s: &str) -> Result<NaiveDate, DateError> {
        let date = parse_wire(s)?;
        if !self.contains(date) {
            return Err(DateError::OutOfWindow {
                date,
                start: self.start,
            });
        }
        Ok(date)
    }

    /// Button label for a date in the window.
    ///
    /// The first two days read "Today"/"Tomorrow"; the rest show the
    /// weekday.
    pub fn label(&self, date: NaiveDate) -> String {
        let offset = (date - self.start).num_days();
        match offset {
            0 => format!("Today ({})", date.format("%d.%m")),
            1 => format!("Tomorrow ({})", date.format("%d.%m")),
            _ => date.format("%d.%m (%a)").to_string(),
        }
    }
}
