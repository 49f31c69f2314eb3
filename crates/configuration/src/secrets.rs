//! Resolution of the storage connection string.
//!
//! The connection string is looked up in two places, in order: the
//! `DATABASE_URL` environment variable, then the `database_url` entry of the
//! host-provided secret store (a TOML file). Blank values count as absent.

use crate::error::ConfigError;
use crate::settings::DatabaseSettings;
use config::FileFormat;
use std::path::{Path, PathBuf};

pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const DATABASE_URL_SECRET: &str = "database_url";

/// Which source supplied the connection string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageSource {
    Environment,
    SecretStore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLocation {
    pub url: String,
    pub source: StorageSource,
}

/// Key/value secrets provided by the hosting environment.
#[derive(Debug, Clone)]
pub struct SecretStore {
    path: Option<PathBuf>,
    values: config::Config,
}

impl SecretStore {
    /// Reads the secret store at `path`. A missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let values = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .build()?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            values,
        })
    }

    /// An in-process store, for hosts that inject secrets directly.
    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        for (key, value) in pairs {
            builder = builder.set_override(key, value)?;
        }
        Ok(Self {
            path: None,
            values: builder.build()?,
        })
    }

    pub fn empty() -> Self {
        Self {
            path: None,
            values: config::Config::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .get_string(key)
            .ok()
            .filter(|value| !value.trim().is_empty())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Applies the ordered fallback: environment value first, secret store second.
pub fn resolve_database_url(
    env_value: Option<String>,
    secrets: &SecretStore,
) -> Result<StorageLocation, ConfigError> {
    if let Some(url) = env_value.filter(|value| !value.trim().is_empty()) {
        return Ok(StorageLocation {
            url,
            source: StorageSource::Environment,
        });
    }
    if let Some(url) = secrets.get(DATABASE_URL_SECRET) {
        return Ok(StorageLocation {
            url,
            source: StorageSource::SecretStore,
        });
    }
    Err(ConfigError::MissingDatabaseUrl {
        env_var: DATABASE_URL_ENV,
        secrets_path: secrets
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<in-process store>".to_string()),
    })
}

/// Resolves the connection string from the real process environment and the
/// secret store named in `settings`.
pub fn resolve_from_environment(
    settings: &DatabaseSettings,
) -> Result<StorageLocation, ConfigError> {
    let env_value = std::env::var(DATABASE_URL_ENV).ok();
    let secrets = SecretStore::load(&settings.secrets_path)?;
    let location = resolve_database_url(env_value, &secrets)?;
    tracing::debug!(source = ?location.source, "Resolved storage location.");
    Ok(location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn environment_wins_over_secret_store() {
        let secrets = SecretStore::from_pairs([("database_url", "sqlite://secret.db")]).unwrap();
        let location =
            resolve_database_url(Some("sqlite://env.db".to_string()), &secrets).unwrap();
        assert_eq!(location.url, "sqlite://env.db");
        assert_eq!(location.source, StorageSource::Environment);
    }

    #[test]
    fn secret_store_is_the_fallback() {
        let secrets = SecretStore::from_pairs([("database_url", "sqlite://secret.db")]).unwrap();
        let location = resolve_database_url(None, &secrets).unwrap();
        assert_eq!(location.url, "sqlite://secret.db");
        assert_eq!(location.source, StorageSource::SecretStore);
    }

    #[test]
    fn blank_environment_value_counts_as_absent() {
        let secrets = SecretStore::from_pairs([("database_url", "sqlite://secret.db")]).unwrap();
        let location = resolve_database_url(Some("  ".to_string()), &secrets).unwrap();
        assert_eq!(location.source, StorageSource::SecretStore);
    }

    #[test]
    fn neither_source_is_a_configuration_error() {
        let err = resolve_database_url(None, &SecretStore::empty()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingDatabaseUrl { env_var: "DATABASE_URL", .. }
        ));
    }

    #[test]
    fn secret_store_reads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        fs::write(&path, "database_url = \"sqlite://farm.db\"\n").unwrap();

        let secrets = SecretStore::load(&path).unwrap();
        assert_eq!(secrets.get("database_url").as_deref(), Some("sqlite://farm.db"));
    }

    #[test]
    fn missing_secret_file_is_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let secrets = SecretStore::load(&dir.path().join("absent.toml")).unwrap();
        assert!(secrets.get("database_url").is_none());

        let err = resolve_database_url(None, &secrets).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }
}
