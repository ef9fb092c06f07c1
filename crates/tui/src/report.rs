use carbon_signal_api::{CarbonReading, IntensityBand};
use chrono::{DateTime, Utc};

/// A successful fetch cycle, formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionReport {
    pub region_code: String,
    pub region_label: String,
    pub usage_text: String,
    pub fossil_text: String,
    pub band: IntensityBand,
    pub measured_at: Option<DateTime<Utc>>,
}

impl RegionReport {
    pub fn new(region_code: &str, region_label: String, reading: &CarbonReading) -> Self {
        Self {
            region_code: region_code.to_string(),
            region_label,
            usage_text: format_usage(reading.carbon_intensity),
            fossil_text: format_fossil(reading.fossil_fuel_percentage),
            band: reading.band(),
            measured_at: reading.measured_at,
        }
    }
}

pub fn format_usage(carbon_intensity: f64) -> String {
    format!(
        "{} grams (CO2 emitted per kilowatt hour)",
        carbon_intensity.round() as i64
    )
}

pub fn format_fossil(fossil_fuel_percentage: f64) -> String {
    format!(
        "{fossil_fuel_percentage:.2}% (percentage of fossil fuels used to generate electricity)"
    )
}

pub fn no_data_message(region_code: &str) -> String {
    format!("Sorry, we have no data for the region you have requested ({region_code}).")
}
