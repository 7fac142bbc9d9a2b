use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::{Config, Error, Location};

/// Maximum number of candidates returned by [`LocationResolver::search`]
pub const SEARCH_LIMIT: usize = 5;
/// Queries shorter than this (in characters) are not sent
pub const MIN_QUERY_CHARS: usize = 3;

/// Resolves free text into candidate [`Location`]s
#[async_trait]
pub trait LocationResolver: Send + Sync {
    /// Queries the upstream service
    async fn fetch(&self, query: &str) -> Result<Vec<Location>, Error>;

    /// Returns at most [`SEARCH_LIMIT`] candidates for `query`, in upstream order.
    /// Short queries are not sent and failures are logged and yield no candidates.
    async fn search(&self, query: &str) -> Vec<Location> {
        if query.chars().count() < MIN_QUERY_CHARS {
            return vec![];
        }
        match self.fetch(query).await {
            Ok(mut locations) => {
                locations.truncate(SEARCH_LIMIT);
                locations
            }
            Err(e) => {
                log::error!("search({query}) failed: {e}");
                vec![]
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    display_name: String,
    lat: String,
    lon: String,
}

/// Parses a Nominatim `format=json` response. Candidates whose coordinates
/// are not decimals are skipped.
fn parse_candidates(data: &[u8]) -> Result<Vec<Location>, Error> {
    let candidates = serde_json::from_slice::<Vec<Candidate>>(data)?;
    Ok(candidates
        .into_iter()
        .filter_map(|candidate| {
            let lat = candidate.lat.trim().parse::<f64>().ok()?;
            let lon = candidate.lon.trim().parse::<f64>().ok()?;
            Some(Location {
                name: candidate.display_name,
                lat,
                lon,
            })
        })
        .collect())
}

/// A [`LocationResolver`] backed by the [Nominatim](https://nominatim.org/) search API
pub struct Nominatim {
    client: reqwest::Client,
    base_url: String,
}

impl Nominatim {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            client,
            base_url: config.search_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl LocationResolver for Nominatim {
    async fn fetch(&self, query: &str) -> Result<Vec<Location>, Error> {
        log::info!("search({query})");
        let limit = SEARCH_LIMIT.to_string();
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("format", "json"), ("q", query), ("limit", limit.as_str())])
            .send()
            .await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::Status {
                status: status.as_u16(),
                body: response.text().await?,
            });
        }
        parse_candidates(&response.bytes().await?)
    }
}
