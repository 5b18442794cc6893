//! Parsed availability results.
//!
//! These are the validated, display-ready counterparts of the railway API
//! DTOs. They are read-only output of a single lookup and never persisted.

use chrono::NaiveDate;

use super::City;

/// What the user asked for: a route on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchQuery {
    pub origin: &'static City,
    pub destination: &'static City,
    pub date: NaiveDate,
}

impl SearchQuery {
    pub fn new(origin: &'static City, destination: &'static City, date: NaiveDate) -> Self {
        Self {
            origin,
            destination,
            date,
        }
    }
}

/// Free seats on a car, by berth category.
///
/// Sitting cars only report `undefined`; sleeper cars split into lower,
/// upper and the two lateral (side) berths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeatBreakdown {
    pub undefined: u32,
    pub lower: u32,
    pub upper: u32,
    pub lateral_lower: u32,
    pub lateral_upper: u32,
}

impl SeatBreakdown {
    /// Sum across all categories. Widened so five full counts cannot overflow.
    pub fn total(&self) -> u64 {
        [
            self.undefined,
            self.lower,
            self.upper,
            self.lateral_lower,
            self.lateral_upper,
        ]
        .into_iter()
        .map(u64::from)
        .sum()
    }

    /// Non-empty categories with their display labels, in a fixed order.
    pub fn categories(&self) -> impl Iterator<Item = (&'static str, u32)> {
        [
            ("Seats", self.undefined),
            ("Lower", self.lower),
            ("Upper", self.upper),
            ("Lateral lower", self.lateral_lower),
            ("Lateral upper", self.lateral_upper),
        ]
        .into_iter()
        .filter(|(_, n)| *n > 0)
    }
}

/// A car type on a specific train, with its seats and price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarOffering {
    /// Car class as named by the API (e.g. "Плацкартный", "Сидячий").
    pub car_type: String,
    /// Free seats as reported for the whole car.
    pub free_seats: u32,
    pub seats: SeatBreakdown,
    /// Base ticket price in so'm.
    pub tariff: u64,
    /// Service fee added on top of the tariff, in so'm.
    pub commission_fee: u64,
}

impl CarOffering {
    /// Ticket price including the commission fee.
    pub fn total_price(&self) -> u64 {
        self.tariff.saturating_add(self.commission_fee)
    }

    /// True when no category has a free seat.
    pub fn is_fully_booked(&self) -> bool {
        self.seats.total() == 0
    }
}

/// One train on the requested route and day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Train {
    pub number: String,
    pub brand: String,
    pub departure_date: String,
    pub departure_time: String,
    pub arrival_date: String,
    pub arrival_time: String,
    /// Travel time as reported by the API (e.g. "02:10").
    pub duration: String,
    /// First station of the train's full route.
    pub route_from: String,
    /// Last station of the train's full route.
    pub route_to: String,
    pub cars: Vec<CarOffering>,
}

impl Train {
    /// Free seats across every car offering.
    pub fn total_seats(&self) -> u64 {
        self.cars
            .iter()
            .map(|c| c.seats.total())
            .fold(0, u64::saturating_add)
    }

    pub fn has_free_seats(&self) -> bool {
        self.cars.iter().any(|c| !c.is_fully_booked())
    }

    /// Cheapest and most expensive total price, if any car is listed.
    pub fn price_range(&self) -> Option<(u64, u64)> {
        let min = self.cars.iter().map(CarOffering::total_price).min()?;
        let max = self.cars.iter().map(CarOffering::total_price).max()?;
        Some((min, max))
    }
}

/// Trains returned by one lookup, in the order the API listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityResult {
    pub trains: Vec<Train>,
}

impl AvailabilityResult {
    pub fn new(trains: Vec<Train>) -> Self {
        Self { trains }
    }

    pub fn len(&self) -> usize {
        self.trains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trains.is_empty()
    }

    pub fn train_numbers(&self) -> impl Iterator<Item = &str> {
        self.trains.iter().map(|t| t.number.as_str())
    }
}
