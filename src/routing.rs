use async_trait::async_trait;
use serde::Deserialize;

use crate::{Config, Error, Location, RouteData};

/// Resolves the ground route between two [`Location`]s
#[async_trait]
pub trait RouteResolver: Send + Sync {
    /// Queries the upstream service. `Ok(None)` means there is no route between the two.
    async fn fetch_route(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<Option<RouteData>, Error>;

    /// Returns the route between `origin` and `destination`, if any.
    /// Failures are logged and yield no route.
    async fn route(&self, origin: &Location, destination: &Location) -> Option<RouteData> {
        match self.fetch_route(origin, destination).await {
            Ok(route) => route,
            Err(e) => {
                log::error!("route({} -> {}) failed: {e}", origin.name, destination.name);
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    #[serde(default)]
    geometry: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

impl OsrmResponse {
    fn into_route(self) -> Option<RouteData> {
        if self.code != "Ok" {
            return None;
        }
        self.routes.into_iter().next().map(|route| RouteData {
            distance_meters: route.distance,
            duration_seconds: route.duration,
            geometry: route.geometry,
        })
    }
}

/// A [`RouteResolver`] backed by the [OSRM](https://project-osrm.org/) driving profile
pub struct Osrm {
    client: reqwest::Client,
    base_url: String,
}

impl Osrm {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            client,
            base_url: config.route_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, origin: &Location, destination: &Location) -> String {
        format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.base_url, origin.lon, origin.lat, destination.lon, destination.lat
        )
    }
}

#[async_trait]
impl RouteResolver for Osrm {
    async fn fetch_route(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<Option<RouteData>, Error> {
        let url = self.url(origin, destination);
        log::info!("route({url})");
        let response = self
            .client
            .get(url)
            .query(&[("overview", "full"), ("geometries", "polyline")])
            .send()
            .await?;
        let status = response.status();
        let data = response.bytes().await?;

        // OSRM answers e.g. `400 {"code": "NoRoute"}` when the points are not connected
        match serde_json::from_slice::<OsrmResponse>(&data) {
            Ok(response) => Ok(response.into_route()),
            Err(_) if !status.is_success() => Err(Error::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&data).into_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}
