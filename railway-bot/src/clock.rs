//! Wall-clock access.
//!
//! The date window and monitor scheduling both depend on "now"; routing it
//! through a trait lets tests pin it.

use std::sync::Mutex;

use chrono::{Local, NaiveDate, NaiveDateTime, TimeDelta};

pub trait Clock: Send + Sync {
    /// Current local date and time.
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// The system clock in the server's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Midnight on `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(date.and_time(chrono::NaiveTime::MIN))
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let clock = FixedClock::at_date(date);
        assert_eq!(clock.today(), date);

        clock.advance(TimeDelta::hours(25));
        assert_eq!(clock.today(), date.succ_opt().unwrap());
        assert_eq!(clock.now().time().to_string(), "01:00:00");
    }
}
