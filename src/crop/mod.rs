//! Crop recommendation: request payload, feature row, and predictor
//!
//! A request carries two categorical fields and four soil measurements.
//! Categories go through the static tables in [`mapping`]; anything absent
//! or unrecognized degrades to a sentinel instead of being rejected:
//!
//! - unknown category → `-1`
//! - missing or non-numeric measurement → `NaN`
//!
//! The row handed to the model always follows [`FEATURE_COLUMNS`].

pub mod mapping;
pub mod predictor;

pub use mapping::{crop_label, previous_crop_code, soil_type_code, UNKNOWN_CODE};
pub use predictor::{CropRecommender, Recommendation, NO_PREDICTION};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::utils::error::{AgriError, Result};

/// Column order of the training-time schema
pub const FEATURE_COLUMNS: [&str; 6] = [
    "Previous Crop",
    "Soil Type",
    "Moisture Level",
    "Nitrogen (N)",
    "Phosphorus (P)",
    "Potassium (K)",
];

/// Number of features the crop model consumes
pub const NUM_FEATURES: usize = FEATURE_COLUMNS.len();

/// JSON body of a crop recommendation request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CropRequest {
    #[serde(rename = "Previous Crop", default, deserialize_with = "lenient_string")]
    pub previous_crop: Option<String>,

    #[serde(rename = "Soil Type", default, deserialize_with = "lenient_string")]
    pub soil_type: Option<String>,

    #[serde(rename = "Moisture Level", default, deserialize_with = "lenient_number")]
    pub moisture_level: Option<f64>,

    #[serde(rename = "Nitrogen (N)", default, deserialize_with = "lenient_number")]
    pub nitrogen: Option<f64>,

    #[serde(rename = "Phosphorus (P)", default, deserialize_with = "lenient_number")]
    pub phosphorus: Option<f64>,

    #[serde(rename = "Potassium (K)", default, deserialize_with = "lenient_number")]
    pub potassium: Option<f64>,
}

impl CropRequest {
    /// Parse a request body. Only a body that is not a JSON object is an error.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)?;
        if !value.is_object() {
            return Err(AgriError::InvalidInput(
                "request body must be a JSON object".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// One model input row
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    pub previous_crop: i64,
    pub soil_type: i64,
    pub moisture_level: f64,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
}

impl FeatureVector {
    pub fn from_request(request: &CropRequest) -> Self {
        let measure = |v: Option<f64>| v.unwrap_or(f64::NAN);
        Self {
            previous_crop: previous_crop_code(request.previous_crop.as_deref()),
            soil_type: soil_type_code(request.soil_type.as_deref()),
            moisture_level: measure(request.moisture_level),
            nitrogen: measure(request.nitrogen),
            phosphorus: measure(request.phosphorus),
            potassium: measure(request.potassium),
        }
    }

    /// Values in [`FEATURE_COLUMNS`] order
    pub fn to_row(&self) -> [f32; NUM_FEATURES] {
        [
            self.previous_crop as f32,
            self.soil_type as f32,
            self.moisture_level as f32,
            self.nitrogen as f32,
            self.phosphorus as f32,
            self.potassium as f32,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_request() {
        let body = br#"{
            "Previous Crop": "Wheat",
            "Soil Type": "Clayey",
            "Moisture Level": 45.5,
            "Nitrogen (N)": 80,
            "Phosphorus (P)": 40,
            "Potassium (K)": 35
        }"#;
        let request = CropRequest::from_json(body).unwrap();
        assert_eq!(request.previous_crop.as_deref(), Some("Wheat"));
        assert_eq!(request.nitrogen, Some(80.0));

        let row = FeatureVector::from_request(&request).to_row();
        assert_eq!(row, [3.0, 2.0, 45.5, 80.0, 40.0, 35.0]);
    }

    #[test]
    fn test_missing_and_odd_fields_degrade() {
        let body = br#"{"Previous Crop": 3, "Nitrogen (N)": "12.5", "Potassium (K)": null, "Extra": true}"#;
        let request = CropRequest::from_json(body).unwrap();
        let features = FeatureVector::from_request(&request);

        assert_eq!(features.previous_crop, UNKNOWN_CODE);
        assert_eq!(features.soil_type, UNKNOWN_CODE);
        assert_eq!(features.nitrogen, 12.5);
        assert!(features.moisture_level.is_nan());
        assert!(features.potassium.is_nan());
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        assert!(matches!(
            CropRequest::from_json(b"[1, 2, 3]"),
            Err(AgriError::InvalidInput(_))
        ));
        assert!(matches!(
            CropRequest::from_json(b"{not json"),
            Err(AgriError::Serialization(_))
        ));
    }

    #[test]
    fn test_feature_column_order() {
        assert_eq!(FEATURE_COLUMNS[0], "Previous Crop");
        assert_eq!(FEATURE_COLUMNS[5], "Potassium (K)");
        assert_eq!(NUM_FEATURES, 6);
    }
}
