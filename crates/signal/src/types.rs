use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Latest carbon data for one region, as reported by the intensity endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonReading {
    /// Grams of CO2 equivalent per kilowatt hour.
    pub carbon_intensity: f64,
    /// Share of generation from fossil fuels, 0..100.
    pub fossil_fuel_percentage: f64,
    pub measured_at: Option<DateTime<Utc>>,
    pub intensity_unit: Option<String>,
}

impl CarbonReading {
    pub fn band(&self) -> IntensityBand {
        IntensityBand::classify(self.carbon_intensity)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LatestResponse {
    pub data: LatestData,
    #[serde(default)]
    pub units: Option<LatestUnits>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LatestData {
    pub carbon_intensity: f64,
    pub fossil_fuel_percentage: f64,
    #[serde(default)]
    pub datetime: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LatestUnits {
    #[serde(default)]
    pub carbon_intensity: Option<String>,
}

impl LatestResponse {
    pub(crate) fn into_reading(self) -> CarbonReading {
        let measured_at = self
            .data
            .datetime
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc));

        CarbonReading {
            carbon_intensity: self.data.carbon_intensity,
            fossil_fuel_percentage: self.data.fossil_fuel_percentage,
            measured_at,
            intensity_unit: self.units.and_then(|u| u.carbon_intensity),
        }
    }
}

/// One entry of the zone-metadata table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneInfo {
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub zone_name: Option<String>,
}

pub type ZoneTable = HashMap<String, ZoneInfo>;

impl ZoneInfo {
    pub fn display_name(&self) -> Option<String> {
        let country = self.country_name.as_deref().filter(|s| !s.is_empty());
        let zone = self.zone_name.as_deref().filter(|s| !s.is_empty());
        match (country, zone) {
            (Some(country), Some(zone)) => Some(format!("{country} - {zone}")),
            (Some(country), None) => Some(country.to_string()),
            (None, Some(zone)) => Some(zone.to_string()),
            (None, None) => None,
        }
    }
}

/// Human readable label for `region_code`, falling back to the code itself.
pub fn zone_label(table: &ZoneTable, region_code: &str) -> String {
    table
        .get(region_code)
        .and_then(ZoneInfo::display_name)
        .unwrap_or_else(|| region_code.to_string())
}

const INTENSITY_SCALE: [(f64, IntensityBand); 5] = [
    (0.0, IntensityBand::VeryLow),
    (150.0, IntensityBand::Low),
    (600.0, IntensityBand::Moderate),
    (750.0, IntensityBand::High),
    (800.0, IntensityBand::VeryHigh),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntensityBand {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl IntensityBand {
    /// Nearest point on the scale wins; ties go to the lower band.
    pub fn classify(carbon_intensity: f64) -> Self {
        let value = carbon_intensity.round();
        let mut best = INTENSITY_SCALE[0];
        for point in INTENSITY_SCALE.iter().skip(1) {
            if (point.0 - value).abs() < (best.0 - value).abs() {
                best = *point;
            }
        }
        best.1
    }

    pub fn label(&self) -> &'static str {
        match self {
            IntensityBand::VeryLow => "very low",
            IntensityBand::Low => "low",
            IntensityBand::Moderate => "moderate",
            IntensityBand::High => "high",
            IntensityBand::VeryHigh => "very high",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_latest_response_with_units_and_timestamp() {
        let body = r#"{
            "countryCode": "DK",
            "data": {
                "datetime": "2024-05-01T10:00:00.000Z",
                "carbonIntensity": 123.6,
                "fossilFuelPercentage": 7.1
            },
            "status": "ok",
            "units": { "carbonIntensity": "gCO2eq/kWh" }
        }"#;
        let response: LatestResponse = serde_json::from_str(body).expect("decode");
        let reading = response.into_reading();

        assert_eq!(reading.carbon_intensity, 123.6);
        assert_eq!(reading.fossil_fuel_percentage, 7.1);
        assert_eq!(reading.intensity_unit.as_deref(), Some("gCO2eq/kWh"));
        assert!(reading.measured_at.is_some());
    }

    #[test]
    fn unparsable_timestamp_is_dropped_not_fatal() {
        let body = r#"{"data":{"carbonIntensity":1,"fossilFuelPercentage":2,"datetime":"yesterday"}}"#;
        let response: LatestResponse = serde_json::from_str(body).expect("decode");
        assert_eq!(response.into_reading().measured_at, None);
    }

    #[test]
    fn missing_intensity_is_a_decode_error() {
        let body = r#"{"data":{"fossilFuelPercentage":2}}"#;
        assert!(serde_json::from_str::<LatestResponse>(body).is_err());
    }

    #[test]
    fn zone_label_prefers_country_and_zone() {
        let mut table = ZoneTable::new();
        table.insert(
            "US-CAL-CISO".to_string(),
            ZoneInfo {
                country_name: Some("USA".to_string()),
                zone_name: Some("CAISO".to_string()),
            },
        );
        table.insert(
            "DE".to_string(),
            ZoneInfo {
                country_name: None,
                zone_name: Some("Germany".to_string()),
            },
        );
        table.insert("XX".to_string(), ZoneInfo::default());

        assert_eq!(zone_label(&table, "US-CAL-CISO"), "USA - CAISO");
        assert_eq!(zone_label(&table, "DE"), "Germany");
        assert_eq!(zone_label(&table, "XX"), "XX");
        assert_eq!(zone_label(&table, "FR"), "FR");
    }

    #[test]
    fn empty_names_count_as_missing() {
        let info = ZoneInfo {
            country_name: Some(String::new()),
            zone_name: Some("Denmark".to_string()),
        };
        assert_eq!(info.display_name().as_deref(), Some("Denmark"));
    }

    #[test]
    fn intensity_bands_follow_nearest_scale_point() {
        assert_eq!(IntensityBand::classify(10.0), IntensityBand::VeryLow);
        assert_eq!(IntensityBand::classify(75.0), IntensityBand::VeryLow);
        assert_eq!(IntensityBand::classify(200.0), IntensityBand::Low);
        assert_eq!(IntensityBand::classify(400.0), IntensityBand::Moderate);
        assert_eq!(IntensityBand::classify(700.0), IntensityBand::High);
        assert_eq!(IntensityBand::classify(790.0), IntensityBand::VeryHigh);
        assert_eq!(IntensityBand::classify(2000.0), IntensityBand::VeryHigh);
    }
}
