use thiserror::Error;

use crate::core::encoding::{EncodedMatrix, FeatureRow};
use crate::core::model::LinearModel;
use crate::models::RentQuery;

/// Errors that can occur while producing a prediction
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("{value:?} is not a recognised {field} category")]
    InvalidCategory { field: &'static str, value: String },

    #[error("Encoded row has {actual} columns, model expects {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Listing is outside the range the model can price (log-scale estimate {log_rent})")]
    EstimateOutOfRange { log_rent: f64 },
}

impl PredictionError {
    /// Whether the caller's input, rather than the service, caused the failure
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PredictionError::InvalidCategory { .. } | PredictionError::EstimateOutOfRange { .. }
        )
    }
}

/// Predicted monthly rent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Rent in dollars, rounded to cents
    pub rent: f64,
    /// Raw model output on the log scale
    pub log_rent: f64,
}

/// Rent predictor: feature encoding followed by a log-linear model
///
/// # Pipeline Stages
/// 1. Category mapping
/// 2. One-hot encoding
/// 3. Reindexing onto the model's columns
/// 4. Linear prediction and inverse log transform
#[derive(Debug, Clone)]
pub struct Predictor {
    model: LinearModel,
}

impl Predictor {
    pub fn new(model: LinearModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    /// Encode a query into the model's design-matrix row
    pub fn encode(&self, query: &RentQuery) -> Result<EncodedMatrix, PredictionError> {
        let row = FeatureRow::from_query(query)?;
        let aligned = row
            .one_hot()
            .reindex(self.model.columns(), self.model.intercept());

        for column in &aligned.dropped {
            if self.model.schema().is_reference_level(column) {
                tracing::trace!("Dropped reference level column {:?}", column);
            } else {
                tracing::warn!("Encoded column {:?} is not known to the model, dropping it", column);
            }
        }

        Ok(aligned.matrix)
    }

    /// Predict the monthly rent for a listing
    pub fn predict(&self, query: &RentQuery) -> Result<Prediction, PredictionError> {
        let matrix = self.encode(query)?;
        let log_rent = self.model.linear_predict(&matrix)?;

        let rent = log_rent.exp();
        if !rent.is_finite() {
            return Err(PredictionError::EstimateOutOfRange { log_rent });
        }

        Ok(Prediction {
            rent: round_cents(rent),
            log_rent,
        })
    }
}

/// Round to two decimal places
#[inline]
fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
