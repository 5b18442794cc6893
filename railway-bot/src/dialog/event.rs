//! Inbound user events.
//!
//! The transport hands us either a typed command (`/start`) or the data
//! payload of a tapped button (`city_2900000`). Both are parsed into an
//! [`Event`] here; anything we do not understand becomes
//! [`Event::Unrecognized`] and is rejected by the state machine.

/// Button payload prefixes and literals.
pub mod payload {
    pub const CITY: &str = "city_";
    pub const DATE: &str = "date_";
    pub const INTERVAL: &str = "interval_";
    pub const STOP_MONITOR: &str = "stop_monitor_";
    pub const RESTART: &str = "restart";
    pub const SETUP_MONITOR: &str = "setup_monitor";
    pub const STOP_ALL_MONITORS: &str = "stop_all_monitors";
}

/// Something the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `/start`.
    Start,
    /// `/restart` or the "New Search" button.
    Restart,
    /// A city button; carries the raw station code.
    CitySelected(String),
    /// A date button; carries the raw `dd.mm.yyyy` text.
    DateSelected(String),
    /// "Monitor this route".
    MonitorRequested,
    /// An interval button; carries the number of minutes.
    IntervalSelected(u32),
    /// `/monitors`.
    ListMonitors,
    StopMonitor(u64),
    StopAllMonitors,
    /// Free text or a payload we do not know.
    Unrecognized(String),
}

impl Event {
    /// Parse a typed message.
    pub fn from_command(text: &str) -> Self {
        // Telegram-style "/start@botname" addressing.
        let command = text.trim().split('@').next().unwrap_or_default();
        match command {
            "/start" => Event::Start,
            "/restart" => Event::Restart,
            "/monitors" => Event::ListMonitors,
            _ => Event::Unrecognized(text.to_string()),
        }
    }

    /// Parse the data carried by a tapped button.
    pub fn from_button(data: &str) -> Self {
        let unrecognized = || Event::Unrecognized(data.to_string());

        match data {
            payload::RESTART => return Event::Restart,
            payload::SETUP_MONITOR => return Event::MonitorRequested,
            payload::STOP_ALL_MONITORS => return Event::StopAllMonitors,
            _ => {}
        }

        if let Some(code) = data.strip_prefix(payload::CITY) {
            Event::CitySelected(code.to_string())
        } else if let Some(date) = data.strip_prefix(payload::DATE) {
            Event::DateSelected(date.to_string())
        } else if let Some(minutes) = data.strip_prefix(payload::INTERVAL) {
            minutes
                .parse()
                .map(Event::IntervalSelected)
                .unwrap_or_else(|_| unrecognized())
        } else if let Some(id) = data.strip_prefix(payload::STOP_MONITOR) {
            id.parse()
                .map(Event::StopMonitor)
                .unwrap_or_else(|_| unrecognized())
        } else {
            unrecognized()
        }
    }

    /// Whether this event manages monitors rather than advancing a search.
    pub fn is_monitor_management(&self) -> bool {
        matches!(
            self,
            Event::ListMonitors | Event::StopMonitor(_) | Event::StopAllMonitors
        )
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Start => "start",
            Event::Restart => "restart",
            Event::CitySelected(_) => "city",
            Event::DateSelected(_) => "date",
            Event::MonitorRequested => "monitor_requested",
            Event::IntervalSelected(_) => "interval",
            Event::ListMonitors => "list_monitors",
            Event::StopMonitor(_) => "stop_monitor",
            Event::StopAllMonitors => "stop_all_monitors",
            Event::Unrecognized(_) => "unrecognized",
        }
    }
}
