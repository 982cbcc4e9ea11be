use std::sync::Arc;

use crate::core::mapper;
use crate::core::pipeline::PredictionError;
use crate::models::RentQuery;

/// Numeric features, passed to the model unchanged
pub const NUMERIC_FEATURES: [&str; 3] = ["sqft", "beds", "bath"];

/// Categorical features, one-hot encoded as `<field>_<category>`
pub const CATEGORICAL_FEATURES: [&str; 5] =
    ["laundry", "pets", "housing_type", "parking", "hood_district"];

/// A single feature value before encoding
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Numeric(f64),
    Category(&'static str),
}

/// One listing expressed in the model's vocabulary, prior to one-hot expansion
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    fields: Vec<(&'static str, FeatureValue)>,
}

impl FeatureRow {
    /// Build a row from a query, mapping every categorical label to its bucket
    pub fn from_query(query: &RentQuery) -> Result<Self, PredictionError> {
        let fields = vec![
            ("sqft", FeatureValue::Numeric(query.sqft as f64)),
            ("beds", FeatureValue::Numeric(query.beds as f64)),
            ("bath", FeatureValue::Numeric(query.bath)),
            ("laundry", FeatureValue::Category(mapper::map_laundry(&query.laundry)?)),
            ("pets", FeatureValue::Category(mapper::map_pets(&query.pets)?)),
            (
                "housing_type",
                FeatureValue::Category(mapper::map_housing_type(&query.housing_type)?),
            ),
            ("parking", FeatureValue::Category(mapper::map_parking(&query.parking)?)),
            (
                mapper::DISTRICT_FIELD,
                FeatureValue::Category(mapper::map_district(query.hood_district)?),
            ),
        ];

        Ok(Self { fields })
    }

    pub fn get(&self, name: &str) -> Option<FeatureValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| *value)
    }

    pub fn fields(&self) -> &[(&'static str, FeatureValue)] {
        &self.fields
    }

    /// Expand categorical values into indicator columns
    ///
    /// Numeric features keep their name. A single row only ever produces the
    /// indicator for the category it holds; the others are implied zero.
    pub fn one_hot(&self) -> OneHotRow {
        let columns = self
            .fields
            .iter()
            .map(|(field, value)| match value {
                FeatureValue::Numeric(v) => (field.to_string(), *v),
                FeatureValue::Category(category) => (indicator_column(field, category), 1.0),
            })
            .collect();

        OneHotRow { columns }
    }
}

/// Name of the indicator column for `field == category`
pub fn indicator_column(field: &str, category: &str) -> String {
    format!("{}_{}", field, category)
}

/// One-hot expansion of a [`FeatureRow`], in encoding order
#[derive(Debug, Clone, PartialEq)]
pub struct OneHotRow {
    columns: Vec<(String, f64)>,
}

impl OneHotRow {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| *value)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(column, _)| column.as_str())
    }

    /// Align the row to an expected column list
    ///
    /// Expected columns missing from the row are zero-filled, the intercept
    /// (if any) is forced to 1.0, and row columns not in `expected` are dropped
    /// and reported back.
    pub fn reindex(&self, expected: &Arc<[String]>, intercept: Option<&str>) -> Aligned {
        let values = expected
            .iter()
            .map(|column| {
                if Some(column.as_str()) == intercept {
                    1.0
                } else {
                    self.get(column).unwrap_or(0.0)
                }
            })
            .collect();

        let dropped = self
            .column_names()
            .filter(|column| !expected.iter().any(|e| e == column))
            .map(str::to_string)
            .collect();

        Aligned {
            matrix: EncodedMatrix {
                columns: Arc::clone(expected),
                values,
            },
            dropped,
        }
    }
}

/// Result of [`OneHotRow::reindex`]
#[derive(Debug, Clone, PartialEq)]
pub struct Aligned {
    pub matrix: EncodedMatrix,
    /// Row columns with no counterpart in the expected list
    pub dropped: Vec<String>,
}

/// A single encoded row, in exactly the model's column order
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedMatrix {
    columns: Arc<[String]>,
    values: Vec<f64>,
}

impl EncodedMatrix {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| self.values[idx])
    }
}
