use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    #[error(
        "No storage location configured: set the {env_var} environment variable \
         or a 'database_url' entry in the secret store at {secrets_path}"
    )]
    MissingDatabaseUrl {
        env_var: &'static str,
        secrets_path: String,
    },

    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}
