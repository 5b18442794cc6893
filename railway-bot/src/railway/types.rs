//! Railway API request and response DTOs.
//!
//! Response types map directly to the availability endpoint's JSON. They
//! use `Option` and `#[serde(default)]` liberally: the API omits fields
//! freely, and unknown fields are ignored so additive changes never break
//! parsing.

use serde::{Deserialize, Serialize};

/// Request body for the availability endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    pub direction: Vec<DirectionRequest>,
    pub station_from: String,
    pub station_to: String,
    /// Ask for per-category seat counts.
    pub detail_num_places: u8,
    /// 0 hides trains with no free seats at all.
    pub show_without_places: u8,
}

/// One leg of the request; the bot only ever asks for the forward leg.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionRequest {
    /// Departure date as `dd.mm.yyyy`.
    pub dep_date: String,
    pub fullday: bool,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Top-level availability response (after unwrapping `express`, if present).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    #[serde(default)]
    pub has_error: bool,

    /// Forward direction first; return legs (never requested) would follow.
    #[serde(default)]
    pub direction: Vec<DirectionDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionDto {
    #[serde(default)]
    pub trains: Vec<TrainGroupDto>,
}

/// The API nests trains one level deeper than one would expect.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainGroupDto {
    #[serde(default)]
    pub train: Vec<TrainDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainDto {
    pub number: String,
    pub brand: Option<String>,
    pub departure: StopTimeDto,
    pub arrival: StopTimeDto,
    pub time_in_way: Option<String>,
    pub route: Option<RouteDto>,
    pub places: Option<PlacesDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTimeDto {
    #[serde(default)]
    pub local_date: String,
    #[serde(default)]
    pub local_time: String,
}

/// Stations on the train's full route, first to last.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteDto {
    #[serde(default)]
    pub station: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlacesDto {
    pub cars: Option<Vec<CarDto>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarDto {
    #[serde(rename = "type")]
    pub car_type: String,
    pub free_seats: Option<Numeric>,
    pub tariffs: Option<TariffsDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TariffsDto {
    #[serde(default)]
    pub tariff: Vec<TariffDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TariffDto {
    pub tariff: Numeric,
    /// Spelled with one "m" by the API.
    #[serde(rename = "comissionFee")]
    pub commission_fee: Option<Numeric>,
    #[serde(default)]
    pub seats: SeatsDto,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatsDto {
    pub seats_undef: Option<Numeric>,
    pub seats_dn: Option<Numeric>,
    pub seats_up: Option<Numeric>,
    pub seats_lateral_dn: Option<Numeric>,
    pub seats_lateral_up: Option<Numeric>,
}

/// A number the API may send either as a JSON number or as a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Int(u64),
    Float(f64),
    Text(String),
}

impl Numeric {
    /// Whole-number value, if this can be read as one.
    ///
    /// Fractional parts are dropped; negative values are rejected.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Numeric::Int(n) => Some(*n),
            Numeric::Float(f) if f.is_finite() && *f >= 0.0 => Some(f.trunc() as u64),
            Numeric::Float(_) => None,
            Numeric::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Some(0);
                }
                s.parse::<u64>().ok().or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite() && *f >= 0.0)
                        .map(|f| f.trunc() as u64)
                })
            }
        }
    }
}
