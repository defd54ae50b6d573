pub mod config;
pub mod error;
pub mod library;

pub use config::{
    Config, FrontmatterConfig, MapProvider, OutputConfig, ServiceConfig, TemperatureUnit,
    ValidationResult, WeatherConfig, DEFAULT_FORMAT,
};
pub use error::{AppError, ConfigError, NetworkError, ReqwestErrorExt};
pub use library::{NamedTemplate, SavedPlace, DEFAULT_PLACE_RADIUS_METERS, DEFAULT_PLACE_TEMPLATE};

use anyhow::Result;

/// Initialize logging. Output goes to stderr so stdout stays usable for note text.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::debug!("GeoNote core initialized");
    Ok(())
}
