use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::models::{HealthResponse, PredictResponse, RentQuery, ServiceInfo};
use crate::routes::errors::ApiError;
use crate::services::ModelStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ModelStore>,
}

/// Configure all prediction-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/", web::get().to(home))
        .route("/health", web::get().to(health_check))
        .route("/predict", web::post().to(predict));
}

/// Service identity
async fn home(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(ServiceInfo {
        message: "San Francisco Rental Price Prediction".to_string(),
        version: state.store.version().to_string(),
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let model_loaded = state.store.is_loaded();

    let response = HealthResponse {
        status: if model_loaded { "OK" } else { "unavailable" }.to_string(),
        version: state.store.version().to_string(),
        model_loaded,
        timestamp: chrono::Utc::now(),
    };

    if model_loaded {
        HttpResponse::Ok().json(response)
    } else {
        tracing::warn!("Health check requested before the model was loaded");
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// Predict rent endpoint
///
/// POST /predict
///
/// Request body:
/// ```json
/// {
///   "sqft": 800,
///   "beds": 2,
///   "bath": 1,
///   "laundry": "(a) in-unit",
///   "pets": "(d) no pets",
///   "housing_type": "(a) single",
///   "parking": "(b) protected",
///   "hood_district": 4
/// }
/// ```
async fn predict(
    state: web::Data<AppState>,
    req: web::Json<RentQuery>,
) -> Result<HttpResponse, ApiError> {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("predict", %request_id);
    let _guard = span.enter();

    if let Err(errors) = req.validate() {
        tracing::warn!("Validation failed for predict request: {}", errors);
        return Err(ApiError::invalid_input(format!("Invalid input: {}", errors)));
    }

    let predictor = state.store.get().ok_or_else(|| {
        tracing::error!("Prediction requested before the model was loaded");
        ApiError::model_unavailable()
    })?;

    tracing::info!("Received input: {:?}", req);

    let prediction = predictor.predict(&req)?;

    tracing::info!(
        "Prediction result: {} (log-scale {:.6})",
        prediction.rent,
        prediction.log_rent
    );

    Ok(HttpResponse::Ok().json(PredictResponse::success(prediction.rent)))
}
