use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `farm.toml`; omitted values fall back to the
/// defaults below.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub metrics: MetricsSettings,
    pub cascade: CascadePolicy,
    pub logging: LoggingSettings,
}

/// Connection pool tuning and the location of the host secret store.
///
/// The connection string itself is never read from here; see
/// [`crate::secrets::resolve_database_url`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub max_connections: u32,
    /// How long an operation may wait for a connection before failing.
    pub acquire_timeout_secs: u64,
    pub secrets_path: PathBuf,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout_secs: 5,
            secrets_path: PathBuf::from(".secrets/secrets.toml"),
        }
    }
}

/// Constants used by the derived-metrics layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    /// Days from insemination to expected calving.
    pub gestation_days: u32,
    /// Stock expiring within this many days is flagged "expiring soon".
    pub expiry_threshold_days: u32,
    /// Health follow-ups due within this many days are listed as upcoming.
    pub follow_up_days: u32,
    /// Standard lactation length; beyond it a cow is considered dry.
    pub lactation_days: u32,
    /// Trailing window used by the dashboard rollups.
    pub dashboard_window_days: u32,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            gestation_days: 283,
            expiry_threshold_days: 30,
            follow_up_days: 7,
            lactation_days: 305,
            dashboard_window_days: 30,
        }
    }
}

/// What happens to child rows when their parent is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildPolicy {
    /// Delete the children together with the parent.
    Cascade,
    /// Refuse to delete a parent that still has children.
    Restrict,
    /// Keep the children and clear their reference. Only valid for optional links.
    Detach,
}

/// Per-relationship delete behaviour. Each field names `parent_child`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadePolicy {
    pub animal_milk: ChildPolicy,
    pub animal_breeding: ChildPolicy,
    pub animal_health: ChildPolicy,
    pub feed_consumption: ChildPolicy,
    pub worker_attendance: ChildPolicy,
    pub equipment_maintenance: ChildPolicy,
    pub medicine_health: ChildPolicy,
}

impl Default for CascadePolicy {
    fn default() -> Self {
        Self {
            animal_milk: ChildPolicy::Cascade,
            animal_breeding: ChildPolicy::Cascade,
            animal_health: ChildPolicy::Cascade,
            feed_consumption: ChildPolicy::Restrict,
            worker_attendance: ChildPolicy::Cascade,
            equipment_maintenance: ChildPolicy::Cascade,
            medicine_health: ChildPolicy::Detach,
        }
    }
}

impl CascadePolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required_links = [
            ("animal_milk", self.animal_milk),
            ("animal_breeding", self.animal_breeding),
            ("animal_health", self.animal_health),
            ("feed_consumption", self.feed_consumption),
            ("worker_attendance", self.worker_attendance),
            ("equipment_maintenance", self.equipment_maintenance),
        ];
        for (name, policy) in required_links {
            if policy == ChildPolicy::Detach {
                return Err(ConfigError::ValidationError(format!(
                    "cascade.{name} cannot be 'detach': the child reference is mandatory"
                )));
            }
        }
        // A medicine leaving stock must not erase an animal's treatment history.
        if self.medicine_health == ChildPolicy::Cascade {
            return Err(ConfigError::ValidationError(
                "cascade.medicine_health must be 'detach' or 'restrict'".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Directory for the daily rolling log file. Logs go to stderr only when unset.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
    /// Filter used when `RUST_LOG` is not set.
    pub default_filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: None,
            file_prefix: "dairy-farm.log".to_string(),
            default_filter: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.metrics.gestation_days == 0 {
            return Err(ConfigError::ValidationError(
                "metrics.gestation_days must be greater than zero".to_string(),
            ));
        }
        if self.metrics.lactation_days == 0 || self.metrics.dashboard_window_days == 0 {
            return Err(ConfigError::ValidationError(
                "metrics.lactation_days and metrics.dashboard_window_days must be greater than zero"
                    .to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        self.cascade.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.metrics.gestation_days, 283);
        assert_eq!(settings.cascade.animal_milk, ChildPolicy::Cascade);
        assert_eq!(settings.cascade.feed_consumption, ChildPolicy::Restrict);
    }

    #[test]
    fn detach_on_mandatory_link_is_rejected() {
        let mut settings = Settings::default();
        settings.cascade.animal_health = ChildPolicy::Detach;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::ValidationError(msg)) if msg.contains("animal_health")
        ));
    }

    #[test]
    fn medicine_cannot_cascade_into_health_history() {
        let mut settings = Settings::default();
        settings.cascade.medicine_health = ChildPolicy::Cascade;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn zero_gestation_is_rejected() {
        let mut settings = Settings::default();
        settings.metrics.gestation_days = 0;
        assert!(settings.validate().is_err());
    }
}
