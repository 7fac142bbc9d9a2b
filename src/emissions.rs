use crate::{CalculationResult, EmissionResult, Level, TransportMode};

/// Flights longer than this (in km) are long-haul
static LONG_HAUL_KM: f64 = 500.0;
/// Long-haul flights amortize take-off and landing over more km
static LONG_HAUL_PLANE_G_PER_KM: f64 = 150.0;
/// kg of CO2 absorbed by one tree in one year
pub static TREE_OFFSET_KG_PER_YEAR: f64 = 22.0;

impl TransportMode {
    /// Emission factor of this mode in g of CO2 per km for a trip of `distance_km`.
    pub fn factor_g_per_km(&self, distance_km: f64) -> f64 {
        match self {
            TransportMode::CarPetrol => 120.0,
            TransportMode::CarDiesel => 110.0,
            TransportMode::CarElectric => 50.0,
            TransportMode::Plane if distance_km > LONG_HAUL_KM => LONG_HAUL_PLANE_G_PER_KM,
            TransportMode::Plane => 250.0,
            TransportMode::Bus => 50.0,
            TransportMode::Train => 14.0,
            TransportMode::Motorcycle => 100.0,
        }
    }
}

/// Returns the emissions in kg of CO2 of one traveller doing `distance_km` with `mode`.
/// Road vehicles are shared by `passengers`; plane, bus and train factors are already per seat.
pub fn mode_co2_kg(mode: TransportMode, distance_km: f64, passengers: u32) -> f64 {
    let co2_kg = distance_km * mode.factor_g_per_km(distance_km) / 1000.0;
    if mode.is_shared_vehicle() {
        co2_kg / passengers.max(1) as f64
    } else {
        co2_kg
    }
}

/// Returns one [`EmissionResult`] per [`TransportMode`], sorted ascending by emissions.
/// Modes with equal emissions keep their declaration order.
pub fn calculate(distance_km: f64, passengers: u32) -> Vec<EmissionResult> {
    let mut emissions = TransportMode::ALL
        .iter()
        .map(|mode| {
            let co2_kg = mode_co2_kg(*mode, distance_km, passengers);
            EmissionResult {
                mode: *mode,
                label: mode.label().to_string(),
                co2_kg,
                level: Level::from_co2_kg(co2_kg),
            }
        })
        .collect::<Vec<_>>();
    emissions.sort_by(|a, b| a.co2_kg.total_cmp(&b.co2_kg));
    emissions
}

/// kg of CO2 saved by taking the best option instead of the worst
pub fn savings_kg(result: &CalculationResult) -> f64 {
    match (result.best(), result.worst()) {
        (Some(best), Some(worst)) => worst.co2_kg - best.co2_kg,
        _ => 0.0,
    }
}

/// Tree-months needed to absorb the emissions of the best option
pub fn trees_per_month(result: &CalculationResult) -> f64 {
    result
        .best()
        .map(|best| best.co2_kg / TREE_OFFSET_KG_PER_YEAR * 12.0)
        .unwrap_or(0.0)
}
