//! Load-time consistency check between a model's column list and the mapper.
//!
//! Reindexing zero-fills anything it cannot find, so a column the encoder can
//! never produce, or a mapper bucket the model never saw, would otherwise go
//! unnoticed and silently skew every prediction.

use crate::core::encoding::{indicator_column, NUMERIC_FEATURES};
use crate::core::mapper;

/// Outcome of inspecting a model's expected columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSchema {
    /// Indicator columns left out of the model, one per categorical field
    pub reference_levels: Vec<String>,
    /// Expected columns the encoder can never produce
    pub unknown_columns: Vec<String>,
    /// Numeric features the model does not use
    pub missing_numeric: Vec<String>,
    /// Categorical fields with more than one bucket absent from the model
    pub drifted_fields: Vec<String>,
}

impl FeatureSchema {
    /// Inspect `columns`, ignoring the intercept column
    pub fn inspect(columns: &[String], intercept: Option<&str>) -> Self {
        let mut schema = FeatureSchema::default();

        let producible = producible_columns();
        schema.unknown_columns = columns
            .iter()
            .filter(|c| Some(c.as_str()) != intercept)
            .filter(|c| !producible.contains(*c))
            .cloned()
            .collect();

        schema.missing_numeric = NUMERIC_FEATURES
            .iter()
            .filter(|feature| !columns.iter().any(|c| c == *feature))
            .map(|feature| feature.to_string())
            .collect();

        for (field, buckets) in categorical_buckets() {
            let absent: Vec<String> = buckets
                .iter()
                .map(|bucket| indicator_column(field, bucket))
                .filter(|column| !columns.contains(column))
                .collect();

            match absent.len() {
                0 => {}
                1 => schema.reference_levels.extend(absent),
                _ => schema.drifted_fields.push(field.to_string()),
            }
        }

        schema
    }

    pub fn is_consistent(&self) -> bool {
        self.unknown_columns.is_empty()
            && self.missing_numeric.is_empty()
            && self.drifted_fields.is_empty()
    }

    /// Whether a dropped indicator column is an expected reference level
    pub fn is_reference_level(&self, column: &str) -> bool {
        self.reference_levels.iter().any(|c| c == column)
    }

    /// Human-readable list of the inconsistencies found
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if !self.unknown_columns.is_empty() {
            problems.push(format!("unknown columns {:?}", self.unknown_columns));
        }
        if !self.missing_numeric.is_empty() {
            problems.push(format!("missing numeric features {:?}", self.missing_numeric));
        }
        if !self.drifted_fields.is_empty() {
            problems.push(format!(
                "fields missing more than one category {:?}",
                self.drifted_fields
            ));
        }
        problems
    }
}

/// Every categorical field with the buckets the mapper can emit for it
fn categorical_buckets() -> Vec<(&'static str, Vec<&'static str>)> {
    let mut fields: Vec<(&'static str, Vec<&'static str>)> = mapper::LABEL_TABLES
        .iter()
        .map(|table| (table.field(), table.buckets()))
        .collect();
    fields.push((mapper::DISTRICT_FIELD, mapper::district_zones()));
    fields
}

/// Every column the encoder can emit
fn producible_columns() -> Vec<String> {
    let mut columns: Vec<String> = NUMERIC_FEATURES.iter().map(|f| f.to_string()).collect();
    for (field, buckets) in categorical_buckets() {
        columns.extend(buckets.iter().map(|bucket| indicator_column(field, bucket)));
    }
    columns
}
