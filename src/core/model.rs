use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::core::encoding::EncodedMatrix;
use crate::core::pipeline::PredictionError;
use crate::core::schema::FeatureSchema;

/// Name of the constant column in the fitted design matrix
pub const INTERCEPT: &str = "const";

/// Errors that can occur while loading a model artifact
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model artifact has no columns")]
    Empty,

    #[error("Model artifact lists {names} columns but {params} coefficients")]
    LengthMismatch { names: usize, params: usize },

    #[error("Coefficient for column {column:?} is not finite")]
    NonFiniteCoefficient { column: String },

    #[error("Column {0:?} is listed more than once")]
    DuplicateColumn(String),

    #[error("Model columns do not match the feature encoder: {0}")]
    SchemaDrift(String),
}

/// Serialized form of a fitted linear model
///
/// `exog_names[i]` is the design-matrix column whose coefficient is `params[i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub exog_names: Vec<String>,
    pub params: Vec<f64>,
}

/// A fitted linear model over a fixed, named column set
#[derive(Debug, Clone)]
pub struct LinearModel {
    columns: Arc<[String]>,
    params: Vec<f64>,
    has_intercept: bool,
    schema: FeatureSchema,
}

impl LinearModel {
    /// Validate an artifact and capture its column list
    ///
    /// When `strict` is set, a column list that disagrees with the feature
    /// encoder is rejected; otherwise the disagreement is logged.
    pub fn from_artifact(artifact: ModelArtifact, strict: bool) -> Result<Self, ModelError> {
        let ModelArtifact { exog_names, params } = artifact;

        if exog_names.is_empty() {
            return Err(ModelError::Empty);
        }
        if exog_names.len() != params.len() {
            return Err(ModelError::LengthMismatch {
                names: exog_names.len(),
                params: params.len(),
            });
        }
        if let Some((column, _)) = exog_names.iter().zip(&params).find(|(_, p)| !p.is_finite()) {
            return Err(ModelError::NonFiniteCoefficient {
                column: column.clone(),
            });
        }
        // A repeated name makes lookups by column ambiguous, so strictness does not apply
        if let Some(column) = exog_names
            .iter()
            .enumerate()
            .find(|(idx, c)| exog_names[..*idx].contains(*c))
            .map(|(_, c)| c)
        {
            return Err(ModelError::DuplicateColumn(column.clone()));
        }

        let has_intercept = exog_names.iter().any(|c| c == INTERCEPT);
        let schema = FeatureSchema::inspect(&exog_names, has_intercept.then_some(INTERCEPT));

        if !schema.is_consistent() {
            let problems = schema.problems().join("; ");
            if strict {
                return Err(ModelError::SchemaDrift(problems));
            }
            tracing::warn!("Serving model despite schema inconsistencies: {}", problems);
        }

        if !has_intercept {
            tracing::warn!("Model has no {:?} column, predictions carry no baseline offset", INTERCEPT);
        }

        Ok(Self {
            columns: exog_names.into(),
            params,
            has_intercept,
            schema,
        })
    }

    /// Parse a JSON artifact
    pub fn from_json_str(json: &str, strict: bool) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = serde_json::from_str(json)?;
        Self::from_artifact(artifact, strict)
    }

    /// Expected column list, in design-matrix order
    pub fn columns(&self) -> &Arc<[String]> {
        &self.columns
    }

    pub fn params(&self) -> &[f64] {
        &self.params
    }

    /// Intercept column name, if the model was fit with one
    pub fn intercept(&self) -> Option<&'static str> {
        self.has_intercept.then_some(INTERCEPT)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Evaluate the linear predictor on one encoded row
    pub fn linear_predict(&self, matrix: &EncodedMatrix) -> Result<f64, PredictionError> {
        if matrix.values().len() != self.params.len() || matrix.columns() != &self.columns[..] {
            return Err(PredictionError::ShapeMismatch {
                expected: self.params.len(),
                actual: matrix.values().len(),
            });
        }

        Ok(matrix
            .values()
            .iter()
            .zip(&self.params)
            .map(|(x, beta)| x * beta)
            .sum())
    }
}
