use crate::error::ConfigError;
use config::builder::DefaultState;
use config::ConfigBuilder;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod secrets;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use secrets::{
    resolve_database_url, resolve_from_environment, SecretStore, StorageLocation, StorageSource,
};
pub use settings::{
    CascadePolicy, ChildPolicy, DatabaseSettings, LoggingSettings, MetricsSettings, Settings,
};

/// Base name of the optional settings file in the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "farm";

/// Loads the application configuration.
///
/// Sources, later ones overriding earlier ones: built-in defaults, an optional
/// `farm.toml` in the working directory, then `FARM_`-prefixed environment
/// variables using `__` between section and key (e.g.
/// `FARM_METRICS__GESTATION_DAYS=280`).
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(DEFAULT_CONFIG_NAME).required(false))
        .add_source(farm_environment());
    finish(builder)
}

/// `FARM_<SECTION>__<KEY>` variables. The prefix is joined with a single `_`,
/// nested keys with `__`.
fn farm_environment() -> config::Environment {
    config::Environment::with_prefix("FARM")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Loads the configuration from an explicit file, without environment overrides.
pub fn load_config_from(path: &Path) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder().add_source(config::File::from(path).required(true));
    finish(builder)
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Settings, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.build()?.try_deserialize::<Settings>()?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use std::path::PathBuf;

    fn load_from_env(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        finish(config::Config::builder().add_source(farm_environment().source(Some(vars))))
    }

    #[test]
    fn environment_overrides_nested_keys() {
        let settings = load_from_env(&[
            ("FARM_METRICS__GESTATION_DAYS", "280"),
            ("FARM_DATABASE__SECRETS_PATH", "/etc/farm/secrets.toml"),
        ])
        .unwrap();

        assert_eq!(settings.metrics.gestation_days, 280);
        assert_eq!(
            settings.database.secrets_path,
            PathBuf::from("/etc/farm/secrets.toml")
        );
        assert_eq!(settings.metrics.lactation_days, 305);
    }

    #[test]
    fn environment_cascade_policy_is_validated() {
        assert!(matches!(
            load_from_env(&[("FARM_CASCADE__ANIMAL_MILK", "detach")]),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("farm.toml");
        fs::write(
            &path,
            r#"
[metrics]
gestation_days = 280
expiry_threshold_days = 14

[cascade]
animal_health = "restrict"
"#,
        )
        .unwrap();

        let settings = load_config_from(&path).unwrap();
        assert_eq!(settings.metrics.gestation_days, 280);
        assert_eq!(settings.metrics.expiry_threshold_days, 14);
        assert_eq!(settings.metrics.lactation_days, 305);
        assert_eq!(settings.cascade.animal_health, ChildPolicy::Restrict);
        assert_eq!(settings.cascade.animal_milk, ChildPolicy::Cascade);
        assert_eq!(settings.database.max_connections, 5);
    }

    #[test]
    fn invalid_policy_in_file_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("farm.toml");
        fs::write(&path, "[cascade]\nworker_attendance = \"detach\"\n").unwrap();

        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
