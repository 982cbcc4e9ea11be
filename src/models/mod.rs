// Model exports
pub mod requests;
pub mod responses;

pub use requests::RentQuery;
pub use responses::{ErrorResponse, HealthResponse, PredictResponse, ServiceInfo};
