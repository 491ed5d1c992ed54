use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, DatabaseSettings, LogFormat, LogSettings, ServerSettings};

/// Prefix for environment overrides, e.g. `TODO__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "TODO";

/// Loads the application configuration.
///
/// Sources are layered: built-in defaults, then the TOML file at `path` (optional,
/// a missing file is not an error), then `TODO__*` environment variables.
/// The merged result is deserialized into our strongly-typed `Config` and validated.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_config_with_env(path, None)
}

/// Same as `load_config`, but reads overrides from `env` instead of the process
/// environment when it is given. Keys keep their full `TODO__...` names.
fn load_config_with_env(
    path: &Path,
    env: Option<config::Map<String, String>>,
) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("server.body_limit_bytes", 64 * 1024)?
        .set_default("database.url", "todos.db")?
        .set_default("database.max_connections", 5)?
        .set_default("log.level", "info")?
        .set_default("log.format", "full")?
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate().map_err(ConfigError::ValidationError)?;

    Ok(config)
}
