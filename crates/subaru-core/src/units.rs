//! Unit normalization for raw telemetry values
//!
//! Pure conversion functions from the units the upstream API reports in
//! to the units of the configured measurement system. Rounding precision
//! follows the field class: temperatures to the nearest whole degree,
//! distances and fuel economy to one decimal, pressures to the nearest
//! whole unit.

use serde::{Deserialize, Serialize};

/// Configured measurement system for displayed values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementSystem {
    #[default]
    Metric,
    Imperial,
}

/// Unit a raw field is reported in by the upstream API
///
/// Most fields are metric, but EV range is reported in miles regardless
/// of region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawUnit {
    Celsius,
    Kilometers,
    Miles,
    LitersPer100Km,
    Hectopascals,
    Percent,
    Minutes,
}

const KM_PER_MILE: f64 = 1.609344;
const MILES_PER_KM: f64 = 0.621371;
const PSI_PER_HPA: f64 = 0.014_503_8;
const MPG_PER_L_100KM: f64 = 235.215;

fn round_whole(value: f64) -> f64 {
    value.round()
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Convert a raw Celsius reading, rounded to the nearest whole degree
pub fn convert_temperature(raw: f64, system: MeasurementSystem) -> f64 {
    match system {
        MeasurementSystem::Metric => round_whole(raw),
        MeasurementSystem::Imperial => round_whole(raw * 9.0 / 5.0 + 32.0),
    }
}

/// Convert a raw distance, rounded to one decimal
pub fn convert_distance(raw: f64, raw_unit: RawUnit, system: MeasurementSystem) -> f64 {
    let value = match (raw_unit, system) {
        (RawUnit::Kilometers, MeasurementSystem::Metric) => raw,
        (RawUnit::Kilometers, MeasurementSystem::Imperial) => raw * MILES_PER_KM,
        (RawUnit::Miles, MeasurementSystem::Metric) => raw * KM_PER_MILE,
        (RawUnit::Miles, MeasurementSystem::Imperial) => raw,
        _ => raw,
    };
    round_tenth(value)
}

/// Convert a raw L/100km fuel-economy reading, rounded to one decimal
///
/// Under imperial units the conversion to mpg is reciprocal, so a raw
/// reading of zero has no finite equivalent and yields None.
pub fn convert_fuel_economy(raw: f64, system: MeasurementSystem) -> Option<f64> {
    match system {
        MeasurementSystem::Metric => Some(round_tenth(raw)),
        MeasurementSystem::Imperial => {
            if raw == 0.0 {
                None
            } else {
                Some(round_tenth(MPG_PER_L_100KM / raw))
            }
        }
    }
}

/// Convert a raw hectopascal pressure reading, rounded to the nearest
/// whole unit
pub fn convert_pressure(raw: f64, system: MeasurementSystem) -> f64 {
    match system {
        MeasurementSystem::Metric => round_whole(raw),
        MeasurementSystem::Imperial => round_whole(raw * PSI_PER_HPA),
    }
}

/// Normalize a raw field value into the configured measurement system
///
/// Pure: the same raw value under the same system always yields the same
/// output. None in, None out; zero and negative raw values convert
/// numerically.
pub fn normalize(raw: Option<f64>, raw_unit: RawUnit, system: MeasurementSystem) -> Option<f64> {
    let raw = raw?;
    match raw_unit {
        RawUnit::Celsius => Some(convert_temperature(raw, system)),
        RawUnit::Kilometers | RawUnit::Miles => Some(convert_distance(raw, raw_unit, system)),
        RawUnit::LitersPer100Km => convert_fuel_economy(raw, system),
        RawUnit::Hectopascals => Some(convert_pressure(raw, system)),
        RawUnit::Percent | RawUnit::Minutes => Some(raw),
    }
}

/// Display unit label for a raw unit under the configured system
pub fn display_unit(raw_unit: RawUnit, system: MeasurementSystem) -> &'static str {
    use MeasurementSystem::{Imperial, Metric};

    match (raw_unit, system) {
        (RawUnit::Celsius, Metric) => "°C",
        (RawUnit::Celsius, Imperial) => "°F",
        (RawUnit::Kilometers | RawUnit::Miles, Metric) => "km",
        (RawUnit::Kilometers | RawUnit::Miles, Imperial) => "mi",
        (RawUnit::LitersPer100Km, Metric) => "L/100km",
        (RawUnit::LitersPer100Km, Imperial) => "mpg",
        (RawUnit::Hectopascals, Metric) => "hPa",
        (RawUnit::Hectopascals, Imperial) => "psi",
        (RawUnit::Percent, _) => "%",
        (RawUnit::Minutes, _) => "min",
    }
}
