//! Application state for the web layer.

use std::sync::Arc;

use crate::dialog::Controller;

use super::outbox::Outbox;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Conversation controller for every user
    pub controller: Arc<Controller>,

    /// Notifications waiting to be collected
    pub outbox: Outbox,
}

impl AppState {
    pub fn new(controller: Controller, outbox: Outbox) -> Self {
        Self {
            controller: Arc::new(controller),
            outbox,
        }
    }
}
