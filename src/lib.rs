//! SF Rent API - rental price prediction service for San Francisco listings
//!
//! This library maps listing attributes onto the one-hot feature space of a
//! fitted log-linear model and serves its predictions over HTTP.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{LinearModel, Prediction, PredictionError, Predictor};
pub use crate::models::{PredictResponse, RentQuery};
pub use crate::services::ModelStore;
