// Route exports
pub mod errors;
pub mod prediction;

use actix_web::web;

pub use errors::{handle_json_payload_error, ApiError};
pub use prediction::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(prediction::configure);
}
