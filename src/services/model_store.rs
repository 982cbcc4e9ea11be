use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

use crate::core::{LinearModel, ModelError, Predictor};

/// Errors that can occur while installing the model
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Model already loaded")]
    AlreadyLoaded,

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Process-wide holder of the loaded predictor
///
/// Starts empty, is filled exactly once at start-up, and is read-only from
/// then on. Shared with every worker behind an `Arc`.
#[derive(Debug)]
pub struct ModelStore {
    predictor: OnceLock<Predictor>,
    version: String,
}

impl ModelStore {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            predictor: OnceLock::new(),
            version: version.into(),
        }
    }

    /// Install the predictor; fails if one is already installed
    pub fn install(&self, predictor: Predictor) -> Result<(), StoreError> {
        self.predictor
            .set(predictor)
            .map_err(|_| StoreError::AlreadyLoaded)
    }

    /// Read a JSON artifact from disk and install it
    pub async fn load_from_path<P: AsRef<Path>>(&self, path: P, strict: bool) -> Result<(), StoreError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(ModelError::from)?;
        let model = LinearModel::from_json_str(&json, strict)?;

        tracing::info!(
            "Loaded model from {} ({} columns, intercept: {})",
            path.display(),
            model.columns().len(),
            model.intercept().is_some()
        );

        self.install(Predictor::new(model))
    }

    pub fn get(&self) -> Option<&Predictor> {
        self.predictor.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.predictor.get().is_some()
    }

    /// Static version tag of the served model
    pub fn version(&self) -> &str {
        &self.version
    }
}
