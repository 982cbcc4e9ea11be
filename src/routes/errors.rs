use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse};

use crate::core::PredictionError;
use crate::models::ErrorResponse;

/// Failure returned by every endpoint, rendered as an [`ErrorResponse`] body
#[derive(Debug)]
pub struct ApiError {
    body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, error: &str, message: impl Into<String>) -> Self {
        Self {
            body: ErrorResponse {
                error: error.to_string(),
                message: message.into(),
                status_code: status.as_u16(),
            },
        }
    }

    /// Client input rejected before or during encoding
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "Invalid input", message)
    }

    pub fn model_unavailable() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Model unavailable",
            "The prediction model is not loaded",
        )
    }

    /// Generic failure; details stay in the server log
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            "Internal Server Error",
        )
    }

    pub fn body(&self) -> &ErrorResponse {
        &self.body
    }

    fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.body.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.body.error, self.body.message)
    }
}

impl std::error::Error for ApiError {}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status()).json(&self.body)
    }
}

impl From<PredictionError> for ApiError {
    fn from(err: PredictionError) -> Self {
        if err.is_client_error() {
            tracing::warn!("Invalid input: {}", err);
            ApiError::invalid_input(format!("Invalid input: {}", err))
        } else {
            tracing::error!("Prediction failed: {}", err);
            ApiError::internal()
        }
    }
}

/// Handle JSON payload errors
///
/// Malformed bodies and type mismatches are reported the same way as
/// range violations.
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::warn!("JSON payload error on {}: {}", req.path(), err);
    ApiError::invalid_input(format!("Invalid JSON: {}", err)).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::MessageBody, test::TestRequest, ResponseError};
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_invalid_category_maps_to_422() {
        let err = PredictionError::InvalidCategory {
            field: "laundry",
            value: "invalid".to_string(),
        };
        let api: ApiError = err.into();
        assert_eq!(api.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(api.body().message.contains("laundry"));
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let err = PredictionError::ShapeMismatch { expected: 15, actual: 3 };
        let api: ApiError = err.into();
        assert_eq!(api.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.body().message, "Internal Server Error");
        assert!(!api.body().message.contains("15"));
    }

    #[test]
    fn test_unavailable_status() {
        assert_eq!(
            ApiError::model_unavailable().status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_error_response_body_matches_status() {
        let api = ApiError::model_unavailable();
        let resp = api.error_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = resp.into_body().try_into_bytes().unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.status_code, 503);
        assert_eq!(body.error, "Model unavailable");
        assert_eq!(body.message, api.body().message);
    }

    #[test]
    fn test_json_payload_error_logged_as_warning() {
        let log = CapturedLog::default();
        let sink = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .finish();

        let req = TestRequest::post().uri("/predict").to_http_request();
        let err = tracing::subscriber::with_default(subscriber, || {
            handle_json_payload_error(error::JsonPayloadError::ContentType, &req)
        });
        assert_eq!(
            err.as_response_error().status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"), "got {:?}", output);
        assert!(output.contains("/predict"));
    }
}
