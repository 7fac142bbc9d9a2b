//! Endpoints and storage locations used by the calculator.

pub static DEFAULT_SEARCH_URL: &str = "https://nominatim.openstreetmap.org";
pub static DEFAULT_ROUTE_URL: &str = "https://router.project-osrm.org";
pub static DEFAULT_USER_AGENT: &str = "EcoCalc-CO2-App/1.0";
pub static DEFAULT_STORAGE_DIR: &str = "database";
pub static DEFAULT_HISTORY_SLOT: &str = "eco_calc_history";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base url of the Nominatim-compatible search service
    pub search_url: String,
    /// Base url of the OSRM-compatible routing service
    pub route_url: String,
    /// Sent on every search request, as required by Nominatim's usage policy
    pub user_agent: String,
    pub storage_dir: String,
    pub history_slot: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            route_url: DEFAULT_ROUTE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            storage_dir: DEFAULT_STORAGE_DIR.to_string(),
            history_slot: DEFAULT_HISTORY_SLOT.to_string(),
        }
    }
}

impl Config {
    /// The blob name of the history in a [`crate::LocalDisk`]
    pub fn history_key(&self) -> String {
        format!(
            "{}/{}.json",
            self.storage_dir.trim_end_matches('/'),
            self.history_slot
        )
    }
}
