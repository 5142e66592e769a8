//! Static category and label tables for the crop recommendation model.
//!
//! The codes are the ones the model was trained with; they are not derived
//! from anything at runtime.

/// Code used for any absent or unrecognized category
pub const UNKNOWN_CODE: i64 = -1;

/// `Previous Crop` label → training code
pub const PREVIOUS_CROP_CODES: [(&str, i64); 7] = [
    ("Groundnut", 1),
    ("Millets", 2),
    ("Wheat", 3),
    ("Maize", 4),
    ("Cotton", 5),
    ("Sorghum", 6),
    ("Barley", 7),
];

/// `Soil Type` label → training code
pub const SOIL_TYPE_CODES: [(&str, i64); 4] = [
    ("Loamy", 1),
    ("Clayey", 2),
    ("Sandy", 3),
    ("Saline", 4),
];

/// Predicted class index → recommended crop
pub const CROP_LABELS: [(i64, &str); 8] = [
    (1, "Wheat"),
    (2, "Rice"),
    (3, "Millets"),
    (4, "Cotton"),
    (5, "Groundnut"),
    (6, "Maize"),
    (7, "Sorghum"),
    (8, "Barley"),
];

fn lookup_code(table: &[(&str, i64)], label: Option<&str>) -> i64 {
    label
        .and_then(|label| table.iter().find(|(name, _)| *name == label))
        .map(|&(_, code)| code)
        .unwrap_or(UNKNOWN_CODE)
}

/// Code for a previous crop; exact, case-sensitive match
pub fn previous_crop_code(label: Option<&str>) -> i64 {
    lookup_code(&PREVIOUS_CROP_CODES, label)
}

/// Code for a soil type; exact, case-sensitive match
pub fn soil_type_code(label: Option<&str>) -> i64 {
    lookup_code(&SOIL_TYPE_CODES, label)
}

/// Crop name for a predicted class, `None` when the class is not in the table
pub fn crop_label(index: i64) -> Option<&'static str> {
    CROP_LABELS
        .iter()
        .find(|(i, _)| *i == index)
        .map(|&(_, name)| name)
}
