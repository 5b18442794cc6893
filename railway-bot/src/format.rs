//! Human-readable rendering of availability results.
//!
//! Everything here is pure: same input, same text. Trains are rendered in
//! the order the API listed them and are never re-sorted.

use std::fmt::Write;

use crate::domain::{AvailabilityResult, CarOffering, SearchQuery, Train, to_wire};

/// Literal shown when a route has no trains on the chosen day.
pub const NO_TRAINS_FOUND: &str = "No trains found.";

/// Shown when a lookup fails for any reason other than an empty result.
pub const FETCH_FAILED: &str =
    "Sorry, there was an error fetching train data. Please try again later with /start.";

const RULE: &str = "==============================";

/// Format an amount in so'm with thousands separators.
///
/// ```
/// assert_eq!(railway_bot::format::format_price(1_234_500), "1,234,500 so'm");
/// ```
pub fn format_price(amount: u64) -> String {
    format!("{} so'm", group_thousands(amount))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// One line for a car offering: type, non-empty seat categories, price.
///
/// A car with no free seats in any category is still listed, marked as
/// fully booked.
pub fn format_car(car: &CarOffering) -> String {
    let seats = if car.is_fully_booked() {
        "fully booked".to_string()
    } else {
        car.seats
            .categories()
            .map(|(label, n)| format!("{label} {n}"))
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "  {}: {} | {} ({} + {} fee)",
        car.car_type,
        seats,
        format_price(car.total_price()),
        group_thousands(car.tariff),
        group_thousands(car.commission_fee),
    )
}

/// Render one train as a text block. `position` is 1-based.
pub fn format_train(position: usize, train: &Train) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    if train.brand.is_empty() {
        let _ = writeln!(out, "Train #{position}: {}", train.number);
    } else {
        let _ = writeln!(out, "Train #{position}: {} ({})", train.number, train.brand);
    }
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Route: {} → {}", train.route_from, train.route_to);
    let _ = writeln!(
        out,
        "Departure: {} ({})",
        train.departure_time, train.departure_date
    );
    let _ = writeln!(out, "Arrival: {} ({})", train.arrival_time, train.arrival_date);
    let _ = writeln!(out, "Duration: {}", train.duration);

    if train.cars.is_empty() {
        let _ = write!(out, "  No car offerings listed");
    } else {
        let _ = writeln!(out, "Cars:");
        let lines: Vec<_> = train.cars.iter().map(format_car).collect();
        out.push_str(&lines.join("\n"));
    }
    out
}

/// Render every train as its own block, preserving API order.
pub fn format_trains(result: &AvailabilityResult) -> Vec<String> {
    result
        .trains
        .iter()
        .enumerate()
        .map(|(i, t)| format_train(i + 1, t))
        .collect()
}

fn route_line(query: &SearchQuery) -> String {
    format!(
        "Route: {} → {}\nDate: {}",
        query.origin.name_ru.to_uppercase(),
        query.destination.name_ru.to_uppercase(),
        to_wire(query.date)
    )
}

/// Full results message: a header for the query followed by train blocks.
pub fn results_message(query: &SearchQuery, result: &AvailabilityResult) -> String {
    let bookable = result.trains.iter().filter(|t| t.has_free_seats()).count();
    let mut out = format!(
        "🚆 TRAIN SEARCH RESULTS\n{RULE}\n{}\nFound {} train(s), {bookable} with available seats\n",
        route_line(query),
        result.len()
    );
    for block in format_trains(result) {
        out.push('\n');
        out.push_str(&block);
        out.push('\n');
    }
    out.truncate(out.trim_end().len());
    out
}

/// Message for a route with no trains on the chosen day.
pub fn no_trains_message(query: &SearchQuery) -> String {
    format!(
        "❌ {NO_TRAINS_FOUND}\n\n{}\n\nTry another date or route. Use /start to search again.",
        route_line(query)
    )
}

/// Short summary of a train, used in monitor notifications.
pub fn train_summary(train: &Train) -> String {
    let mut out = String::new();
    if train.brand.is_empty() {
        let _ = writeln!(out, "Train {}", train.number);
    } else {
        let _ = writeln!(out, "Train {} ({})", train.number, train.brand);
    }
    let _ = writeln!(out, "Departure: {}", train.departure_time);
    let _ = writeln!(out, "Arrival: {}", train.arrival_time);
    let _ = write!(out, "Seats: {}", train.total_seats());

    match train.price_range() {
        Some((min, max)) if min == max => {
            let _ = write!(out, "\nPrice: {}", format_price(min));
        }
        Some((min, max)) => {
            let _ = write!(
                out,
                "\nPrice: {}-{}",
                group_thousands(min),
                format_price(max)
            );
        }
        None => {}
    }
    out
}
