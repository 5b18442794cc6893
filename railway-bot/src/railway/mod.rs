//! Railway availability API client.
//!
//! This module talks to the e-ticket availability endpoint, which lists the
//! trains between two stations on a given day together with per-car seat
//! counts and prices.
//!
//! Key characteristics of the API:
//! - Requests are a single POST; dates travel as `dd.mm.yyyy`
//! - Responses may or may not be wrapped in an `express` object
//! - Numbers arrive as JSON numbers or as strings, depending on the field
//! - A successful response can still carry `hasError: true`

mod client;
mod convert;
mod error;
mod mock;
mod types;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{AvailabilityResult, StationCode};

pub use client::{RailwayClient, RailwayConfig};
pub use convert::{ConversionError, convert_response, decode_body};
pub use error::FetchError;
pub use mock::MockRailwayClient;
pub use types::{AvailabilityRequest, AvailabilityResponse, CarDto, Numeric, TrainDto};

/// Anything that can answer an availability lookup.
///
/// Implementations make at most one upstream request per call and keep no
/// state between calls.
#[async_trait]
pub trait AvailabilitySource: Send + Sync {
    async fn fetch(
        &self,
        origin: StationCode,
        destination: StationCode,
        date: NaiveDate,
    ) -> Result<AvailabilityResult, FetchError>;
}
