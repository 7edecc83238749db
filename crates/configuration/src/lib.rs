// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{Config, DatabaseSettings};

/// Loads the application configuration from the `config.toml` file.
///
/// The file is optional; every setting has a default, so a missing file
/// yields the default configuration. Settings can also be overridden through
/// `WORKSHOP_`-prefixed environment variables (e.g.
/// `WORKSHOP_DATABASE__MAX_CONNECTIONS`).
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // Tells the builder to look for a file named `config.toml`
        .add_source(config::File::with_name("config.toml").required(false))
        .add_source(config::Environment::with_prefix("WORKSHOP").separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;

    Ok(config)
}
