//! Lookup tables translating listing labels into the buckets the model was fit on.
//!
//! The labels are the literal strings the client form sends (`"(a) in-unit"`),
//! the buckets are the category values seen at training time (`"in-unit"`).
//! Several labels may collapse onto one bucket.

use crate::core::pipeline::PredictionError;

/// A closed label -> bucket table for one categorical field
#[derive(Debug, Clone, Copy)]
pub struct CategoryTable {
    field: &'static str,
    entries: &'static [(&'static str, &'static str)],
}

impl CategoryTable {
    /// Feature name this table feeds
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Map a label onto its bucket
    pub fn lookup(&self, label: &str) -> Result<&'static str, PredictionError> {
        self.entries
            .iter()
            .find(|(known, _)| *known == label)
            .map(|(_, bucket)| *bucket)
            .ok_or_else(|| PredictionError::InvalidCategory {
                field: self.field,
                value: label.to_string(),
            })
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.iter().any(|(known, _)| *known == label)
    }

    /// Accepted labels in declaration order
    pub fn labels(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|(label, _)| *label)
    }

    /// Distinct buckets in first-seen order
    pub fn buckets(&self) -> Vec<&'static str> {
        distinct(self.entries.iter().map(|(_, bucket)| *bucket))
    }
}

pub const LAUNDRY: CategoryTable = CategoryTable {
    field: "laundry",
    entries: &[
        ("(a) in-unit", "in-unit"),
        ("(b) on-site", "not in-unit"),
        ("(c) no laundry", "not in-unit"),
    ],
};

pub const PETS: CategoryTable = CategoryTable {
    field: "pets",
    entries: &[
        ("(a) both", "allows_dogs"),
        ("(b) dogs", "allows_dogs"),
        ("(c) cats", "no_dogs"),
        ("(d) no pets", "no_dogs"),
    ],
};

pub const HOUSING_TYPE: CategoryTable = CategoryTable {
    field: "housing_type",
    entries: &[
        ("(a) single", "single"),
        ("(b) double", "multi"),
        ("(c) multi", "multi"),
    ],
};

/// Parking labels reach the model unchanged, the table only guards membership
pub const PARKING: CategoryTable = CategoryTable {
    field: "parking",
    entries: &[
        ("(a) unknown", "(a) unknown"),
        ("(b) protected", "(b) protected"),
        ("(c) off-street", "(c) off-street"),
        ("(d) no parking", "(d) no parking"),
    ],
};

/// Every string-labelled table, in feature order
pub const LABEL_TABLES: [CategoryTable; 4] = [LAUNDRY, PETS, HOUSING_TYPE, PARKING];

pub const DISTRICT_FIELD: &str = "hood_district";

pub const DISTRICT_MIN: f64 = 1.0;
pub const DISTRICT_MAX: f64 = 10.0;

/// District codes grouped into geographic zones
const DISTRICTS: [(u8, &str); 10] = [
    (1, "west"),
    (2, "southwest"),
    (3, "southwest"),
    (4, "central"),
    (5, "central"),
    (6, "central"),
    (7, "marina"),
    (8, "north beach"),
    (9, "FiDi/SOMA"),
    (10, "southwest"),
];

/// Map a district code onto its zone
///
/// Only whole codes 1 through 10 are known; `4.0` maps, `4.5` does not.
pub fn map_district(code: f64) -> Result<&'static str, PredictionError> {
    let invalid = || PredictionError::InvalidCategory {
        field: DISTRICT_FIELD,
        value: code.to_string(),
    };

    if !code.is_finite() || code.fract() != 0.0 {
        return Err(invalid());
    }

    DISTRICTS
        .iter()
        .find(|(known, _)| f64::from(*known) == code)
        .map(|(_, zone)| *zone)
        .ok_or_else(invalid)
}

/// Distinct district zones in first-seen order
pub fn district_zones() -> Vec<&'static str> {
    distinct(DISTRICTS.iter().map(|(_, zone)| *zone))
}

pub fn map_laundry(label: &str) -> Result<&'static str, PredictionError> {
    LAUNDRY.lookup(label)
}

pub fn map_pets(label: &str) -> Result<&'static str, PredictionError> {
    PETS.lookup(label)
}

pub fn map_housing_type(label: &str) -> Result<&'static str, PredictionError> {
    HOUSING_TYPE.lookup(label)
}

pub fn map_parking(label: &str) -> Result<&'static str, PredictionError> {
    PARKING.lookup(label)
}

fn distinct(values: impl Iterator<Item = &'static str>) -> Vec<&'static str> {
    let mut seen: Vec<&'static str> = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
