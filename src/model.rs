use serde::{Deserialize, Serialize};

use crate::Location;

/// Distance and duration of a ground route between two [`Location`]s
#[derive(Debug, Clone, PartialEq)]
pub struct RouteData {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    /// Encoded polyline of the path, when the router returns it
    pub geometry: Option<String>,
}

impl RouteData {
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_seconds / 60.0
    }
}

/// The transport modes compared in every calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportMode {
    CarPetrol,
    CarDiesel,
    CarElectric,
    Plane,
    Bus,
    Train,
    Motorcycle,
}

impl TransportMode {
    /// All modes, in declaration order
    pub const ALL: [TransportMode; 7] = [
        TransportMode::CarPetrol,
        TransportMode::CarDiesel,
        TransportMode::CarElectric,
        TransportMode::Plane,
        TransportMode::Bus,
        TransportMode::Train,
        TransportMode::Motorcycle,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TransportMode::CarPetrol => "Car (Petrol)",
            TransportMode::CarDiesel => "Car (Diesel)",
            TransportMode::CarElectric => "Car (Electric)",
            TransportMode::Plane => "Plane",
            TransportMode::Bus => "Bus",
            TransportMode::Train => "Train",
            TransportMode::Motorcycle => "Motorcycle",
        }
    }

    /// Whether the emissions of this mode are shared among its passengers
    pub fn is_shared_vehicle(&self) -> bool {
        matches!(
            self,
            TransportMode::CarPetrol
                | TransportMode::CarDiesel
                | TransportMode::CarElectric
                | TransportMode::Motorcycle
        )
    }
}

/// Qualitative severity of a single [`EmissionResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    /// `< 5` is low, `[5, 20)` is medium and `>= 20` is high.
    pub fn from_co2_kg(co2_kg: f64) -> Self {
        if co2_kg < 5.0 {
            Level::Low
        } else if co2_kg < 20.0 {
            Level::Medium
        } else {
            Level::High
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            Level::Low => "Eco-friendly",
            Level::Medium => "Moderate",
            Level::High => "High impact",
        }
    }
}

/// The estimated emissions of a trip for a single [`TransportMode`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionResult {
    pub mode: TransportMode,
    pub label: String,
    /// kg of CO2 per traveller
    #[serde(rename = "co2kg")]
    pub co2_kg: f64,
    pub level: Level,
}

/// The outcome of a successful calculation, as displayed and kept in history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub origin: Location,
    pub destination: Location,
    pub distance_km: f64,
    pub duration_min: f64,
    pub passengers: u32,
    /// One entry per [`TransportMode`], ascending by `co2_kg`
    pub emissions: Vec<EmissionResult>,
    /// Milliseconds since the unix epoch
    pub timestamp: i64,
}

impl CalculationResult {
    /// Computes the emissions of every mode for the ground route between
    /// `origin` and `destination`.
    pub fn new(
        origin: Location,
        destination: Location,
        route: &RouteData,
        passengers: u32,
        timestamp: i64,
    ) -> Self {
        let distance_km = route.distance_km();
        Self {
            origin,
            destination,
            distance_km,
            duration_min: route.duration_min(),
            passengers,
            emissions: crate::calculate(distance_km, passengers),
            timestamp,
        }
    }

    /// The lowest-emission option
    pub fn best(&self) -> Option<&EmissionResult> {
        self.emissions.first()
    }

    /// The highest-emission option
    pub fn worst(&self) -> Option<&EmissionResult> {
        self.emissions.last()
    }
}
