//! [`Config`]-related definitions.

use std::{path::PathBuf, time};

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use secrecy::SecretString;
use serde::Deserialize;
use service::infra::geocoder::nominatim;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: Server,

    /// Database configuration.
    #[serde(default)]
    pub database: Database,

    /// Geocoding configuration.
    #[serde(default)]
    pub geocoding: Geocoding,

    /// Log configuration.
    #[serde(default)]
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(3000)]
    pub port: u16,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,

    /// Directory of static client files served for non-API requests.
    #[default(PathBuf::from("public"))]
    pub static_dir: PathBuf,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// List of allowed origins.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Database configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Database {
    /// Path to the SQLite database file.
    ///
    /// `:memory:` designates an in-memory database.
    #[default(PathBuf::from("rental_database.db"))]
    pub path: PathBuf,

    /// Indicator whether an empty database should be seeded with sample
    /// rentals.
    pub seed_sample_data: bool,
}

/// Geocoding configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Geocoding {
    /// Base URL of the [Nominatim]-compatible service.
    ///
    /// [Nominatim]: https://nominatim.org
    #[default("https://nominatim.openstreetmap.org".to_owned())]
    pub base_url: String,

    /// `User-Agent` header identifying this application to the service.
    #[default("RentalExperienceMap/1.0".to_owned())]
    pub user_agent: String,

    /// API key of the service, if it requires one.
    pub api_key: Option<SecretString>,

    /// Delay before each retry with a simplified address.
    #[default(time::Duration::from_secs(1))]
    #[serde(with = "humantime_serde")]
    pub retry_delay: time::Duration,
}

impl From<Geocoding> for nominatim::Config {
    fn from(value: Geocoding) -> Self {
        let Geocoding {
            base_url,
            user_agent,
            api_key,
            retry_delay: _,
        } = value;

        Self {
            base_url,
            user_agent,
            api_key,
        }
    }
}

impl From<&Geocoding> for service::Config {
    fn from(value: &Geocoding) -> Self {
        Self {
            geocoding_retry_delay: value.retry_delay,
        }
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
