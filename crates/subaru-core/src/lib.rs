//! Core types for the Subaru telematics engine
//!
//! This crate provides the fundamental types shared by every other crate in
//! the workspace: Vin, VehicleInfo, VehicleStatus, the unit normalizer, and
//! the per-entry integration options.

mod options;
mod status;
mod units;
mod vehicle;
mod vin;

pub use options::{IntegrationOptions, NotificationPreference};
pub use status::{fields, VehicleStatus};
pub use units::{
    convert_distance, convert_fuel_economy, convert_pressure, convert_temperature, display_unit,
    normalize, MeasurementSystem, RawUnit,
};
pub use vehicle::{ApiGeneration, DeviceInfo, VehicleInfo};
pub use vin::{Vin, VinError};

/// Integration domain, used in device identifiers and entity platforms
pub const DOMAIN: &str = "subaru";

/// Manufacturer reported in device identity metadata
pub const MANUFACTURER: &str = "Subaru Corp.";

/// Slugify a display name into an entity object_id
///
/// Lowercases, maps runs of non-alphanumeric characters to single
/// underscores, and trims leading/trailing underscores, matching the
/// host platform's entity naming.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_sep = true;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('_');
            last_was_sep = true;
        }
    }

    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}
