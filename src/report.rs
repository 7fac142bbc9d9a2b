//! Markdown rendering of a [`CalculationResult`].
use serde::Serialize;
use tinytemplate::TinyTemplate;

use crate::{savings_kg, trees_per_month, CalculationResult};

static TEMPLATE: &str = r#"# {origin} → {destination}

Calculated on {date}.

* Distance by road: {distance_km} km ({straight_km} km in a straight line)
* Duration by road: {duration}
* Passengers: {passengers}

## Summary

* Best option: **{best_label}** ({best_kg} kg CO2)
* Offset: {trees_per_month} trees/month
* Potential savings: {savings_kg} kg CO2

## CO2 per passenger

| Mode | kg CO2 | Level | |
|---|---|---|---|
{{ for row in rows }}| {row.label} | {row.co2_kg} | {row.badge} | {{ if row.best }}best choice{{ endif }} |
{{ endfor }}
## How to reduce your impact?

{{ for tip in tips }}* {tip}
{{ endfor }}"#;
static TEMPLATE_NAME: &str = "t";

static TIPS: [&str; 3] = [
    "Prefer public transport or trains on medium distances: it can save up to 90% of the CO2.",
    "When driving, share the ride: splitting it among 3 people divides your share accordingly.",
    "On international trips prefer direct flights: take-off is the most polluting phase.",
];

#[derive(Serialize)]
struct Row {
    label: String,
    co2_kg: String,
    badge: &'static str,
    best: bool,
}

#[derive(Serialize)]
struct Context {
    origin: String,
    destination: String,
    date: String,
    distance_km: String,
    straight_km: String,
    duration: String,
    passengers: u32,
    best_label: String,
    best_kg: String,
    trees_per_month: String,
    savings_kg: String,
    rows: Vec<Row>,
    tips: &'static [&'static str],
}

/// `yyyy-mm-dd` of an epoch-millis timestamp
pub fn date(timestamp: i64) -> String {
    time::OffsetDateTime::from_unix_timestamp_nanos(timestamp as i128 * 1_000_000)
        .ok()
        .and_then(|datetime| {
            datetime
                .format(time::macros::format_description!("[year]-[month]-[day]"))
                .ok()
        })
        .unwrap_or_else(|| timestamp.to_string())
}

/// e.g. `3 h 05 min` or `45 min`
pub fn duration(minutes: f64) -> String {
    let total = minutes.max(0.0).round() as u64;
    let (hours, minutes) = (total / 60, total % 60);
    if hours > 0 {
        format!("{hours} h {minutes:02} min")
    } else {
        format!("{minutes} min")
    }
}

/// Renders `result` as a markdown report.
pub fn render(result: &CalculationResult) -> Result<String, tinytemplate::error::Error> {
    let best = result.best();
    let context = Context {
        origin: result.origin.name.clone(),
        destination: result.destination.name.clone(),
        date: date(result.timestamp),
        distance_km: format!("{:.1}", result.distance_km),
        straight_km: format!("{:.1}", result.origin.distance(&result.destination)),
        duration: duration(result.duration_min),
        passengers: result.passengers,
        best_label: best.map(|e| e.label.clone()).unwrap_or_default(),
        best_kg: format!("{:.2}", best.map(|e| e.co2_kg).unwrap_or_default()),
        trees_per_month: format!("{:.1}", trees_per_month(result)),
        savings_kg: format!("{:.1}", savings_kg(result)),
        rows: result
            .emissions
            .iter()
            .enumerate()
            .map(|(i, e)| Row {
                label: e.label.clone(),
                co2_kg: format!("{:.2}", e.co2_kg),
                badge: e.level.badge(),
                best: i == 0,
            })
            .collect(),
        tips: &TIPS,
    };

    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);
    tt.add_template(TEMPLATE_NAME, TEMPLATE)?;
    tt.render(TEMPLATE_NAME, &context)
}

/// One line describing a history entry, e.g. `2024-05-01 · 313.5 km · Lisboa → Porto · 4.4 kg CO2`
pub fn summary(result: &CalculationResult) -> String {
    format!(
        "{} · {:.1} km · {} → {} · {:.1} kg CO2",
        date(result.timestamp),
        result.distance_km,
        result.origin.short_name(),
        result.destination.short_name(),
        result.best().map(|e| e.co2_kg).unwrap_or_default(),
    )
}
