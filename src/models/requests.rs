use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::core::mapper::{self, CategoryTable};

/// Listing attributes submitted for a rent prediction
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RentQuery {
    /// Area in square feet
    #[validate(range(min = 100))]
    pub sqft: i64,
    /// Number of bedrooms
    #[validate(range(min = 0))]
    pub beds: i64,
    /// Number of bathrooms
    #[validate(range(min = 0.0))]
    pub bath: f64,
    #[validate(custom(function = "validate_laundry"))]
    pub laundry: String,
    #[validate(custom(function = "validate_pets"))]
    pub pets: String,
    #[validate(custom(function = "validate_housing_type"))]
    pub housing_type: String,
    #[validate(custom(function = "validate_parking"))]
    pub parking: String,
    /// District code (1 to 10)
    #[validate(range(min = 1.0, max = 10.0))]
    pub hood_district: f64,
}

fn validate_laundry(value: &str) -> Result<(), ValidationError> {
    validate_label(&mapper::LAUNDRY, value)
}

fn validate_pets(value: &str) -> Result<(), ValidationError> {
    validate_label(&mapper::PETS, value)
}

fn validate_housing_type(value: &str) -> Result<(), ValidationError> {
    validate_label(&mapper::HOUSING_TYPE, value)
}

fn validate_parking(value: &str) -> Result<(), ValidationError> {
    validate_label(&mapper::PARKING, value)
}

/// Enumeration check backed by the mapper table, so both always agree
fn validate_label(table: &CategoryTable, value: &str) -> Result<(), ValidationError> {
    if table.contains(value) {
        return Ok(());
    }

    let allowed: Vec<&str> = table.labels().collect();
    let mut error = ValidationError::new("unknown_category");
    error.message = Some(Cow::from(format!(
        "{:?} is not a valid {}; expected one of {:?}",
        value,
        table.field(),
        allowed
    )));
    Err(error)
}
