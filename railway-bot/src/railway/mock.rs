//! Mock railway client for running without API access.
//!
//! Loads recorded availability responses from JSON files and serves them
//! as if they were live API responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{AvailabilityResult, StationCode};

use super::AvailabilitySource;
use super::convert::decode_body;
use super::error::FetchError;

/// Mock railway client that serves recorded responses from disk.
///
/// Files are named `{FROM}_{TO}.json` after the two station codes (e.g.
/// `2900000_2900700.json`) and hold a raw API response body. The travel date
/// is ignored. Routes without a file answer with no trains.
#[derive(Debug, Clone)]
pub struct MockRailwayClient {
    /// Raw response bodies, keyed by (origin, destination).
    bodies: Arc<HashMap<(StationCode, StationCode), String>>,
}

impl MockRailwayClient {
    /// Create a new mock client by loading JSON files from a directory.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, FetchError> {
        let data_dir = data_dir.as_ref();
        let mut bodies = HashMap::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| {
            FetchError::NotConfigured(format!("failed to read mock data directory: {e}"))
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| {
                FetchError::NotConfigured(format!("failed to read directory entry: {e}"))
            })?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| FetchError::NotConfigured(format!("invalid filename: {path:?}")))?;
            let key = parse_route_key(stem).ok_or_else(|| {
                FetchError::NotConfigured(format!("filename is not FROM_TO: {stem}"))
            })?;

            let body = std::fs::read_to_string(&path)
                .map_err(|e| FetchError::NotConfigured(format!("failed to read {path:?}: {e}")))?;

            // Reject malformed fixtures at startup rather than on first use.
            match decode_body(&body) {
                Ok(_) | Err(FetchError::EmptyResult | FetchError::Rejected) => {}
                Err(e) => {
                    return Err(FetchError::NotConfigured(format!(
                        "failed to parse {path:?}: {e}"
                    )));
                }
            }

            bodies.insert(key, body);
        }

        if bodies.is_empty() {
            return Err(FetchError::NotConfigured(format!(
                "no mock route files found in {data_dir:?}"
            )));
        }

        Ok(Self {
            bodies: Arc::new(bodies),
        })
    }

    /// Number of routes with recorded responses.
    pub fn route_count(&self) -> usize {
        self.bodies.len()
    }
}

fn parse_route_key(stem: &str) -> Option<(StationCode, StationCode)> {
    let (from, to) = stem.split_once('_')?;
    Some((StationCode::parse(from).ok()?, StationCode::parse(to).ok()?))
}

#[async_trait]
impl AvailabilitySource for MockRailwayClient {
    async fn fetch(
        &self,
        origin: StationCode,
        destination: StationCode,
        date: NaiveDate,
    ) -> Result<AvailabilityResult, FetchError> {
        debug!(%origin, %destination, %date, "serving mock availability");
        match self.bodies.get(&(origin, destination)) {
            Some(body) => decode_body(body),
            None => Err(FetchError::EmptyResult),
        }
    }
}
