// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};
use std::path::Path;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::Settings;

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
pub fn load_settings() -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());
    load_settings_from(
        Path::new("config"),
        &environment,
        // Environment variables like `APP_STRATEGY__SLOW_PERIOD=20`.
        Environment::with_prefix("APP")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    )
}

/// Loads settings from `dir`, layering `<environment>.toml` and `env` over `base.toml`.
pub fn load_settings_from(dir: &Path, environment: &str, env: Environment) -> Result<Settings> {
    let settings = Config::builder()
        .add_source(File::with_name(&dir.join("base").to_string_lossy()))
        .add_source(File::with_name(&dir.join(environment).to_string_lossy()).required(false))
        .add_source(env)
        .build()?;

    let settings: Settings = settings.try_deserialize()?;
    validate(&settings)?;
    Ok(settings)
}

fn validate(settings: &Settings) -> Result<()> {
    let strategy = &settings.strategy;
    if strategy.fast_period == 0 || strategy.slow_period == 0 {
        return Err(Error::Invalid("moving-average periods must be greater than 0".into()));
    }
    if strategy.buy_threshold.is_sign_negative() || strategy.sell_threshold.is_sign_negative() {
        return Err(Error::Invalid("signal thresholds must not be negative".into()));
    }
    Ok(())
}
