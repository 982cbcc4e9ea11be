use actix_web::http::{header::HeaderValue, Uri};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub model: ModelSettings,
    #[serde(default)]
    pub cors: CorsSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }

#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    /// Path to the JSON model artifact
    #[serde(default = "default_model_path")]
    pub path: String,
    /// Version tag reported by `/` and `/health`
    #[serde(default = "default_model_version")]
    pub version: String,
    /// Refuse to start when the artifact's columns disagree with the encoder
    #[serde(default = "default_strict_schema")]
    pub strict_schema: bool,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            version: default_model_version(),
            strict_schema: default_strict_schema(),
        }
    }
}

fn default_model_path() -> String { "model/model.json".to_string() }
fn default_model_version() -> String { "1.0.0".to_string() }
fn default_strict_schema() -> bool { true }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsSettings {
    /// Allowed browser origins; `*` allows any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl CorsSettings {
    /// Reject origins the CORS middleware could not be built from
    pub fn validate(&self) -> Result<(), ConfigError> {
        for origin in self.allowed_origins.iter().filter(|origin| *origin != "*") {
            let invalid = |reason: String| {
                ConfigError::Message(format!("Invalid CORS origin {:?}: {}", origin, reason))
            };

            let uri = origin.parse::<Uri>().map_err(|e| invalid(e.to_string()))?;
            if uri.scheme().is_none() || uri.host().is_none() {
                return Err(invalid("expected scheme://host[:port]".to_string()));
            }
            HeaderValue::from_str(origin).map_err(|e| invalid(e.to_string()))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with RENT_)
    /// 5. ALLOWED_ORIGINS (comma-separated)
    pub fn load() -> Result<Self, ConfigError> {
        Self::layered(environment(), std::env::var("ALLOWED_ORIGINS").ok())
    }

    fn layered(environment: Environment, allowed_origins: Option<String>) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., RENT__SERVER__PORT -> server.port
            .add_source(environment)
            .build()?;

        let settings = apply_allowed_origins(settings, allowed_origins)?;

        settings.try_deserialize::<Settings>()?.validated()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize::<Settings>()?.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        self.cors.validate()?;
        Ok(self)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("RENT")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Override `cors.allowed_origins` from a comma-separated list
fn apply_allowed_origins(settings: Config, origins: Option<String>) -> Result<Config, ConfigError> {
    let Some(origins) = origins else {
        return Ok(settings);
    };

    let origins: Vec<String> = origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect();

    Config::builder()
        .add_source(settings)
        .set_override("cors.allowed_origins", origins)?
        .build()
}
