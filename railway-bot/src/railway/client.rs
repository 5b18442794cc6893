//! Railway availability HTTP client.
//!
//! Issues exactly one POST per lookup. No retries and no caching: a failed
//! request is reported to the user, who can simply ask again.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use tracing::{info, warn};

use crate::domain::{AvailabilityResult, StationCode, to_wire};

use super::AvailabilitySource;
use super::convert::decode_body;
use super::error::FetchError;
use super::types::{AvailabilityRequest, DirectionRequest};

/// Default base URL for the railway e-ticket site.
const DEFAULT_BASE_URL: &str = "https://e-ticket.railway.uz";

/// Path of the seat availability endpoint.
const AVAILABILITY_PATH: &str = "/api/v3/trains/availability/space/between/stations";

/// The endpoint only answers requests that look like they come from the
/// site's own frontend.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/26.0.1 Safari/605.1.15";

/// Configuration for the railway client.
#[derive(Debug, Clone)]
pub struct RailwayConfig {
    /// XSRF token sent both as header and cookie
    pub api_token: String,
    /// Base URL of the site (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Value for `Accept-Language`; the API localises train brands
    pub language: String,
}

impl RailwayConfig {
    /// Create a new config with the given XSRF token.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            language: "uz".to_string(),
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the response language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// Railway availability API client.
#[derive(Debug, Clone)]
pub struct RailwayClient {
    http: reqwest::Client,
    url: String,
}

impl RailwayClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RailwayConfig) -> Result<Self, FetchError> {
        let headers = default_headers(&config)?;

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: format!("{}{}", config.base_url, AVAILABILITY_PATH),
        })
    }

    /// Query seat availability between two stations on a date.
    pub async fn get_availability(
        &self,
        origin: StationCode,
        destination: StationCode,
        date: NaiveDate,
    ) -> Result<AvailabilityResult, FetchError> {
        let request = build_request(origin, destination, date);

        let response = self.http.post(&self.url).json(&request).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(FetchError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;
        info!(
            %origin,
            %destination,
            date = %date,
            bytes = body.len(),
            "availability response received"
        );

        decode_body(&body).inspect_err(|e| {
            if e.is_transient() {
                warn!(%origin, %destination, error = %e, "availability lookup failed");
            }
        })
    }
}

#[async_trait]
impl AvailabilitySource for RailwayClient {
    async fn fetch(
        &self,
        origin: StationCode,
        destination: StationCode,
        date: NaiveDate,
    ) -> Result<AvailabilityResult, FetchError> {
        self.get_availability(origin, destination, date).await
    }
}

/// Build the request body for a forward, full-day lookup.
fn build_request(origin: StationCode, destination: StationCode, date: NaiveDate) -> AvailabilityRequest {
    AvailabilityRequest {
        direction: vec![DirectionRequest {
            dep_date: to_wire(date),
            fullday: true,
            kind: "Forward".to_string(),
        }],
        station_from: origin.to_string(),
        station_to: destination.to_string(),
        detail_num_places: 1,
        show_without_places: 0,
    }
}

fn default_headers(config: &RailwayConfig) -> Result<HeaderMap, FetchError> {
    let value = |v: &str, what: &str| {
        HeaderValue::from_str(v).map_err(|_| FetchError::NotConfigured(format!("invalid {what}")))
    };

    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(header::ACCEPT_LANGUAGE, value(&config.language, "language")?);
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
    headers.insert(header::ORIGIN, value(&config.base_url, "base URL")?);
    headers.insert(
        header::REFERER,
        value(&format!("{}/uz/pages/trains-page", config.base_url), "base URL")?,
    );
    headers.insert(
        HeaderName::from_static("device-type"),
        HeaderValue::from_static("BROWSER"),
    );
    headers.insert(
        HeaderName::from_static("x-xsrf-token"),
        value(&config.api_token, "API token format")?,
    );
    headers.insert(
        header::COOKIE,
        value(&format!("XSRF-TOKEN={}", config.api_token), "API token format")?,
    );
    Ok(headers)
}
