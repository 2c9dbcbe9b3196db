//! HTTP client for a postcodes.io-style postcode lookup service.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GeocodeError};
use crate::model::GeoLocation;
use crate::traits::PostcodeLookup;

#[derive(Debug, Clone)]
pub struct PostcodesConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_batch_size: usize,
    pub user_agent: String,
}

impl Default for PostcodesConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.postcodes.io".to_string(),
            timeout_secs: 8,
            max_batch_size: 100,
            user_agent: concat!("day-route-planner/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl PostcodesConfig {
    /// Defaults overridden by `POSTCODES_BASE_URL`, `POSTCODES_TIMEOUT_SECS`
    /// and `POSTCODES_BATCH_SIZE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("POSTCODES_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Ok(timeout) = std::env::var("POSTCODES_TIMEOUT_SECS") {
            config.timeout_secs = timeout
                .parse()
                .map_err(|_| ConfigError::invalid(format!("POSTCODES_TIMEOUT_SECS is not a number: {timeout}")))?;
        }
        if let Ok(batch) = std::env::var("POSTCODES_BATCH_SIZE") {
            config.max_batch_size = batch
                .parse()
                .map_err(|_| ConfigError::invalid(format!("POSTCODES_BATCH_SIZE is not a number: {batch}")))?;
        }

        if config.max_batch_size == 0 {
            return Err(ConfigError::invalid("POSTCODES_BATCH_SIZE must be at least 1"));
        }
        if config.timeout_secs == 0 {
            return Err(ConfigError::invalid("POSTCODES_TIMEOUT_SECS must be at least 1"));
        }

        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct PostcodesClient {
    config: PostcodesConfig,
    client: reqwest::blocking::Client,
}

impl PostcodesClient {
    pub fn new(config: PostcodesConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &PostcodesConfig {
        &self.config
    }
}

impl PostcodeLookup for PostcodesClient {
    fn lookup(&self, postcode: &str) -> Result<Option<GeoLocation>, GeocodeError> {
        let url = format!(
            "{}/postcodes/{}",
            self.config.base_url,
            urlencoding::encode(postcode)
        );

        let response = self.client.get(url).send()?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let body: LookupResponse = response.json()?;
        Ok(body.result.and_then(PostcodeResult::into_location))
    }

    fn lookup_batch(&self, postcodes: &[String]) -> Result<Vec<Option<GeoLocation>>, GeocodeError> {
        if postcodes.is_empty() {
            return Ok(Vec::new());
        }
        if postcodes.len() > self.config.max_batch_size {
            return Err(GeocodeError::BatchTooLarge {
                size: postcodes.len(),
                max: self.config.max_batch_size,
            });
        }

        let url = format!("{}/postcodes", self.config.base_url);
        let body: BulkResponse = self
            .client
            .post(url)
            .json(&BulkRequest { postcodes })
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<BulkResponse>())?;

        map_bulk_response(postcodes, body)
    }

    fn max_batch_size(&self) -> usize {
        self.config.max_batch_size
    }
}

/// Pair each queried postcode with its entry in the bulk response.
///
/// The service answers in request order; entries are matched by position and
/// the echoed query is only checked for agreement.
fn map_bulk_response(
    postcodes: &[String],
    body: BulkResponse,
) -> Result<Vec<Option<GeoLocation>>, GeocodeError> {
    let entries = body
        .result
        .ok_or_else(|| GeocodeError::Malformed("bulk response has no result array".to_string()))?;

    if entries.len() != postcodes.len() {
        return Err(GeocodeError::BatchMismatch {
            expected: postcodes.len(),
            got: entries.len(),
        });
    }

    postcodes
        .iter()
        .zip(entries)
        .map(|(postcode, entry)| {
            let echoed = entry.query.replace(char::is_whitespace, "");
            if !echoed.eq_ignore_ascii_case(postcode) {
                return Err(GeocodeError::Malformed(format!(
                    "bulk response out of order: sent {postcode}, got {}",
                    entry.query
                )));
            }
            Ok(entry.result.and_then(PostcodeResult::into_location))
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct BulkRequest<'a> {
    postcodes: &'a [String],
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    result: Option<PostcodeResult>,
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    result: Option<Vec<BulkEntry>>,
}

#[derive(Debug, Deserialize)]
struct BulkEntry {
    query: String,
    result: Option<PostcodeResult>,
}

#[derive(Debug, Deserialize)]
struct PostcodeResult {
    postcode: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    parish: Option<String>,
    admin_district: Option<String>,
}

impl PostcodeResult {
    /// Terminated or unlocated postcodes come back without coordinates.
    fn into_location(self) -> Option<GeoLocation> {
        Some(GeoLocation {
            lat: self.latitude?,
            lng: self.longitude?,
            postcode: self.postcode,
            parish: self.parish,
            district: self.admin_district,
        })
    }
}
