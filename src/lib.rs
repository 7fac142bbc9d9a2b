#[forbid(unsafe_code)]
pub mod config;
mod emissions;
mod error;
pub mod fs;
mod geocoding;
pub mod history;
mod model;
pub mod report;
mod routing;
mod session;
pub mod state;

pub use config::Config;
pub use emissions::*;
pub use error::{CalculationError, Error};
pub use fs::{BlobStorageProvider, InMemory, LocalDisk};
pub use geocoding::*;
pub use history::{History, HISTORY_CAPACITY};
pub use model::*;
pub use routing::*;
pub use session::*;
pub use state::{Action, AppState, Field};

/// A geocoded point, as returned by a [`LocationResolver`]
#[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
        }
    }

    pub fn pos(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }

    /// The part of the name before the first comma (e.g. "Lisboa" for "Lisboa, Portugal")
    pub fn short_name(&self) -> &str {
        self.name.split(',').next().unwrap_or(&self.name).trim()
    }

    /// Returns the great-circle distance to another [`Location`] in km
    pub fn distance(&self, other: &Self) -> f64 {
        distance(self.pos(), other.pos())
    }
}

/// Returns the distance between two geo-points in km
fn distance(from: (f64, f64), to: (f64, f64)) -> f64 {
    let from = geoutils::Location::new(from.0, from.1);
    let to = geoutils::Location::new(to.0, to.1);
    from.haversine_distance_to(&to).meters() / 1000.0
}

/// The current time in milliseconds since the unix epoch
pub fn now_millis() -> i64 {
    (time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
