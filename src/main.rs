use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use sf_rent_api::config::{CorsSettings, LoggingSettings, Settings};
use sf_rent_api::routes::{self, handle_json_payload_error, AppState};
use sf_rent_api::services::ModelStore;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Initialize logging; `RUST_LOG` takes precedence over the configured level
fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.format.as_str() {
        "json" => subscriber.json().init(),
        "pretty" => subscriber.pretty().init(),
        _ => subscriber.init(),
    }
}

fn build_cors(settings: &CorsSettings) -> Cors {
    let base = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

    if settings.allowed_origins.iter().any(|origin| origin == "*") {
        return base.allow_any_origin();
    }

    settings
        .allowed_origins
        .iter()
        .fold(base.supports_credentials(), |cors, origin| cors.allowed_origin(origin))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_tracing(&settings.logging);

    info!("Starting SF rent prediction service...");
    info!("Configuration loaded successfully");

    // The model is loaded before the listener is bound; a broken artifact stops start-up
    let store = Arc::new(ModelStore::new(settings.model.version.clone()));
    if let Err(e) = store
        .load_from_path(&settings.model.path, settings.model.strict_schema)
        .await
    {
        error!("Failed to load model from {}: {}", settings.model.path, e);
        return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
    }

    info!("Model {} ready", store.version());

    let app_state = AppState { store };
    let cors_settings = settings.cors.clone();

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!(
        "Starting HTTP server on {}:{} (allowed origins: {:?})",
        host, port, cors_settings.allowed_origins
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(build_cors(&cors_settings))
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
