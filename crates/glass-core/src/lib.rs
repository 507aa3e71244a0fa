pub mod config;
pub mod coords;
pub mod error;

pub use config::{ApiConfig, Config, LocationConfig, RadarConfig, ValidationResult};
pub use coords::{CoordinateId, Coordinates};
pub use error::{
    AppError, ConfigError, LocationError, NetworkError, PersistenceError, ReqwestErrorExt,
    RusqliteErrorExt, WeatherError,
};

use anyhow::Result;

/// Initialize tracing for the process.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Weather Glass core initialized");
    Ok(())
}
