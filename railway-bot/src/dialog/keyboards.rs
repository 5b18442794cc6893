//! Inline keyboards offered at each step.

use crate::domain::{City, DateWindow, to_wire};
use crate::message::{Button, Keyboard};
use crate::monitor::{CheckInterval, Monitor};

use super::event::payload;

/// One button per city, in menu order.
pub fn cities<'a>(list: impl IntoIterator<Item = &'a City>) -> Keyboard {
    Keyboard::column(list.into_iter().map(|c| {
        Button::new(c.display_name, format!("{}{}", payload::CITY, c.station_code))
    }))
}

/// One button per day in the window, starting today.
pub fn dates(window: DateWindow) -> Keyboard {
    Keyboard::column(
        window
            .days()
            .map(|d| Button::new(window.label(d), format!("{}{}", payload::DATE, to_wire(d)))),
    )
}

pub fn intervals() -> Keyboard {
    Keyboard::column(CheckInterval::ALL.into_iter().map(|i| {
        let label = match i.minutes() {
            1 => "Every 1 minute".to_string(),
            n => format!("Every {n} minutes"),
        };
        Button::new(label, format!("{}{}", payload::INTERVAL, i.minutes()))
    }))
}

/// Follow-up actions under a successful result.
pub fn result_actions() -> Keyboard {
    Keyboard::column([
        Button::new("📡 Monitor this route", payload::SETUP_MONITOR),
        Button::new("🔍 New Search", payload::RESTART),
    ])
}

/// A stop button per monitor plus "stop all".
pub fn monitor_controls(monitors: &[Monitor]) -> Keyboard {
    let stops = monitors.iter().map(|m| {
        Button::new(
            format!(
                "Stop {} → {}",
                m.query.origin.display_name, m.query.destination.display_name
            ),
            format!("{}{}", payload::STOP_MONITOR, m.id),
        )
    });
    Keyboard::column(stops.chain([Button::new(
        "Stop All Monitors",
        payload::STOP_ALL_MONITORS,
    )]))
}
