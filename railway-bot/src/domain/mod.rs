//! Domain types for the railway availability bot.
//!
//! All types enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod availability;
mod city;
mod date_window;
mod station;
mod user;

pub use availability::{AvailabilityResult, CarOffering, SearchQuery, SeatBreakdown, Train};
pub use city::{CITIES, City, CityDirectory};
pub use date_window::{DateError, DateWindow, WINDOW_DAYS, parse_wire, to_wire};
pub use station::{InvalidStationCode, StationCode};
pub use user::UserId;
