//! Conversion from railway API DTOs to domain types.

use crate::domain::{AvailabilityResult, CarOffering, SeatBreakdown, Train};

use super::error::FetchError;
use super::types::{AvailabilityResponse, CarDto, Numeric, TrainDto};

/// Errors that can occur converting a response into domain types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("train {train}: {field} is not a number ({value})")]
    InvalidNumber {
        train: String,
        field: &'static str,
        value: String,
    },
}

/// Decode a raw response body into an availability result.
///
/// The API sometimes wraps its payload in an `express` object; both shapes
/// are accepted. A flagged error becomes [`FetchError::Rejected`] and a
/// successful answer without trains becomes [`FetchError::EmptyResult`].
pub fn decode_body(body: &str) -> Result<AvailabilityResult, FetchError> {
    let decode_error = |e: serde_json::Error| FetchError::Decode {
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    };

    let mut raw: serde_json::Value = serde_json::from_str(body).map_err(decode_error)?;
    if let Some(inner) = raw.get_mut("express") {
        raw = inner.take();
    }
    let response: AvailabilityResponse = serde_json::from_value(raw).map_err(decode_error)?;

    if response.has_error {
        return Err(FetchError::Rejected);
    }

    let result = convert_response(&response).map_err(|e| FetchError::Decode {
        message: e.to_string(),
        body: None,
    })?;

    if result.is_empty() {
        return Err(FetchError::EmptyResult);
    }
    Ok(result)
}

/// Convert a parsed response into domain trains, preserving API order.
///
/// Only the forward direction is read. Trains without any car listing are
/// skipped (the API lists them when nothing is on sale); cars without a
/// tariff are skipped.
pub fn convert_response(response: &AvailabilityResponse) -> Result<AvailabilityResult, ConversionError> {
    let Some(direction) = response.direction.first() else {
        return Ok(AvailabilityResult::default());
    };

    let mut trains = Vec::new();
    for train in direction.trains.iter().flat_map(|g| g.train.iter()) {
        if let Some(converted) = convert_train(train)? {
            trains.push(converted);
        }
    }

    Ok(AvailabilityResult::new(trains))
}

fn convert_train(dto: &TrainDto) -> Result<Option<Train>, ConversionError> {
    let Some(cars) = dto.places.as_ref().and_then(|p| p.cars.as_ref()) else {
        return Ok(None);
    };
    if cars.is_empty() {
        return Ok(None);
    }

    let mut offerings = Vec::with_capacity(cars.len());
    for car in cars {
        if let Some(offering) = convert_car(&dto.number, car)? {
            offerings.push(offering);
        }
    }

    let stations = dto.route.as_ref().map(|r| r.station.as_slice()).unwrap_or_default();
    let route_from = stations.first().cloned().unwrap_or_default();
    let route_to = stations.last().cloned().unwrap_or_default();

    Ok(Some(Train {
        number: dto.number.clone(),
        brand: dto.brand.clone().unwrap_or_default(),
        departure_date: dto.departure.local_date.clone(),
        departure_time: dto.departure.local_time.clone(),
        arrival_date: dto.arrival.local_date.clone(),
        arrival_time: dto.arrival.local_time.clone(),
        duration: dto.time_in_way.clone().unwrap_or_default(),
        route_from,
        route_to,
        cars: offerings,
    }))
}

fn convert_car(train: &str, car: &CarDto) -> Result<Option<CarOffering>, ConversionError> {
    // Only the first tariff is meaningful; the API never sends more in practice.
    let Some(tariff) = car.tariffs.as_ref().and_then(|t| t.tariff.first()) else {
        return Ok(None);
    };

    let number = |field: &'static str, value: Option<&Numeric>| -> Result<u64, ConversionError> {
        match value {
            None => Ok(0),
            Some(v) => v.as_u64().ok_or_else(|| ConversionError::InvalidNumber {
                train: train.to_string(),
                field,
                value: format!("{v:?}"),
            }),
        }
    };
    let seats = |field: &'static str, value: Option<&Numeric>| -> Result<u32, ConversionError> {
        number(field, value).map(|n| u32::try_from(n).unwrap_or(u32::MAX))
    };

    let s = &tariff.seats;
    Ok(Some(CarOffering {
        car_type: car.car_type.clone(),
        free_seats: seats("freeSeats", car.free_seats.as_ref())?,
        seats: SeatBreakdown {
            undefined: seats("seatsUndef", s.seats_undef.as_ref())?,
            lower: seats("seatsDn", s.seats_dn.as_ref())?,
            upper: seats("seatsUp", s.seats_up.as_ref())?,
            lateral_lower: seats("seatsLateralDn", s.seats_lateral_dn.as_ref())?,
            lateral_upper: seats("seatsLateralUp", s.seats_lateral_up.as_ref())?,
        },
        tariff: number("tariff", Some(&tariff.tariff))?,
        commission_fee: number("comissionFee", tariff.commission_fee.as_ref())?,
    }))
}
