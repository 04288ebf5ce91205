//! Settings are layered: built-in defaults, then `clubledger.toml`, then
//! `CLUBLEDGER_*` environment variables, then command-line flags.
//!
//! ```toml
//! [database]
//! path = "/srv/club/ledger.db"
//! busy_timeout_ms = 2000
//!
//! [limits]
//! monthly_expense = 200000
//!
//! [display]
//! list_limit = 100
//!
//! [logging]
//! level = "info"
//! file = "/var/log/clubledger.log"
//! ```

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const CONFIG_FILE_NAME: &str = "clubledger.toml";
const DATABASE_FILE_NAME: &str = "clubledger.db";
const ENV_PREFIX: &str = "CLUBLEDGER";

#[derive(Debug, thiserror::Error)]
pub(crate) enum SettingsError {
    #[error("could not load settings: {0}")]
    Load(#[from] config::ConfigError),
    #[error("limits.monthly_expense must be greater than zero, got {0}")]
    InvalidMonthlyLimit(i64),
    #[error("display.list_limit must be greater than zero")]
    InvalidListLimit,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct DatabaseSettings {
    pub(crate) path: PathBuf,
    pub(crate) busy_timeout_ms: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: default_data_dir().join(DATABASE_FILE_NAME),
            busy_timeout_ms: 2000,
        }
    }
}

impl DatabaseSettings {
    pub(crate) fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct LimitSettings {
    /// Whole currency units of expenses allowed per calendar month.
    pub(crate) monthly_expense: i64,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            monthly_expense: 200_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct DisplaySettings {
    pub(crate) list_limit: u32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { list_limit: 100 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct LoggingSettings {
    pub(crate) level: String,
    pub(crate) file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) database: DatabaseSettings,
    pub(crate) limits: LimitSettings,
    pub(crate) display: DisplaySettings,
    pub(crate) logging: LoggingSettings,
}

/// Command-line flags that take precedence over the settings file.
#[derive(Debug, Clone, Default, clap::Args)]
pub(crate) struct Overrides {
    /// Settings file (TOML). Defaults to clubledger.toml in the user config directory.
    #[arg(long, global = true)]
    pub(crate) config: Option<PathBuf>,
    /// SQLite database file.
    #[arg(long, global = true)]
    pub(crate) db: Option<PathBuf>,
    /// Monthly expense limit in whole currency units.
    #[arg(long, global = true)]
    pub(crate) monthly_limit: Option<i64>,
}

pub(crate) fn load(overrides: &Overrides) -> Result<Settings, SettingsError> {
    let config_path = overrides
        .config
        .clone()
        .unwrap_or_else(|| default_config_dir().join(CONFIG_FILE_NAME));

    let builder = config::Config::builder()
        .add_source(config::File::from(config_path).required(overrides.config.is_some()))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if let Some(db) = &overrides.db {
        settings.database.path = db.clone();
    }
    if let Some(limit) = overrides.monthly_limit {
        settings.limits.monthly_expense = limit;
    }

    settings.validate()?;
    Ok(settings)
}

impl Settings {
    fn validate(&self) -> Result<(), SettingsError> {
        if self.limits.monthly_expense <= 0 {
            return Err(SettingsError::InvalidMonthlyLimit(
                self.limits.monthly_expense,
            ));
        }
        if self.display.list_limit == 0 {
            return Err(SettingsError::InvalidListLimit);
        }
        Ok(())
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("org", "clubledger", "ClubLedger")
}

fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_config_dir() -> PathBuf {
    project_dirs()
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("clubledger.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.limits.monthly_expense, 200_000);
        assert_eq!(settings.display.list_limit, 100);
        assert_eq!(settings.logging.level, "info");
        assert!(settings.database.path.ends_with(DATABASE_FILE_NAME));
        assert_eq!(settings.database.busy_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            [database]
            path = "/tmp/club.db"

            [limits]
            monthly_expense = 300000
            "#,
        );
        let overrides = Overrides {
            config: Some(path),
            ..Default::default()
        };
        let settings = load(&overrides).unwrap();
        assert_eq!(settings.database.path, PathBuf::from("/tmp/club.db"));
        assert_eq!(settings.limits.monthly_expense, 300_000);
        // Unset keys keep their defaults.
        assert_eq!(settings.display.list_limit, 100);
        assert_eq!(settings.database.busy_timeout_ms, 2000);
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[limits]\nmonthly_expense = 300000\n");
        let overrides = Overrides {
            config: Some(path),
            db: Some(PathBuf::from("/tmp/other.db")),
            monthly_limit: Some(50_000),
        };
        let settings = load(&overrides).unwrap();
        assert_eq!(settings.database.path, PathBuf::from("/tmp/other.db"));
        assert_eq!(settings.limits.monthly_expense, 50_000);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let overrides = Overrides {
            config: Some(dir.path().join("nope.toml")),
            ..Default::default()
        };
        assert!(matches!(load(&overrides), Err(SettingsError::Load(_))));
    }

    #[test]
    fn test_non_positive_limit_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "");
        let overrides = Overrides {
            config: Some(path),
            monthly_limit: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            load(&overrides),
            Err(SettingsError::InvalidMonthlyLimit(0))
        ));
    }
}
