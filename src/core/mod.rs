// Core prediction exports
pub mod encoding;
pub mod mapper;
pub mod model;
pub mod pipeline;
pub mod schema;

pub use encoding::{EncodedMatrix, FeatureRow, FeatureValue, OneHotRow};
pub use model::{LinearModel, ModelArtifact, ModelError, INTERCEPT};
pub use pipeline::{Prediction, PredictionError, Predictor};
pub use schema::FeatureSchema;
