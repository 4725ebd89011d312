//! Configuration for the cell broadcast settings
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats stored in the platform config directory.
//!
//! Configuration is organized into sections:
//! - Region policy (per-build and per-region resource overrides)
//! - Telephony (slot count, phone type and SIM countries for the static
//!   telephony collaborator)
//! - Developer mode and preference file location

use cellbroadcast_core::StaticTelephony;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};

/// Directory name under the platform config directory
pub const CONFIG_DIR_NAME: &str = "cellbroadcast";

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default preference file name
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Upper bound on SIM slots accepted from configuration
const MAX_PHONE_COUNT: u32 = 8;

/// Region and build policy flags
///
/// Read-only for the lifetime of a settings surface; defaults for
/// region-dependent preferences are read from it at lookup time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionPolicy {
    /// Default for channel 50 alerts (Brazil/India area info)
    pub default_channel_50_enabled: bool,
    /// Default for channel 60 alerts (India)
    pub default_channel_60_enabled: bool,
    /// Show the general alert settings and the ETWS category
    pub show_etws_settings: bool,
    /// Show the CMAS threat and amber settings
    pub show_cmas_settings: bool,
    /// Show the Brazil category regardless of SIM country
    pub show_brazil_settings: bool,
    /// Show the India category regardless of SIM country
    pub show_india_settings: bool,
    /// Expose the alert tone toggle
    pub alert_tone_enabled: bool,
    /// Show presidential alerts as always on
    pub show_presidential_alert: bool,
    /// Hide the master "turn on notifications" toggle
    pub remove_turn_on_notification: bool,
    /// Hide the alert reminder interval
    pub remove_alert_reminder: bool,
}

impl Default for RegionPolicy {
    fn default() -> Self {
        Self {
            default_channel_50_enabled: false,
            default_channel_60_enabled: false,
            show_etws_settings: false,
            show_cmas_settings: true,
            show_brazil_settings: false,
            show_india_settings: false,
            alert_tone_enabled: false,
            show_presidential_alert: false,
            remove_turn_on_notification: false,
            remove_alert_reminder: false,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Developer options toggle
    pub developer_settings_enabled: bool,
    /// Preference file; defaults to the config directory
    pub preferences_path: Option<PathBuf>,
    /// Region policy
    pub policy: RegionPolicy,
    /// Static telephony values
    pub telephony: StaticTelephony,
}

impl AppConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config directory for this application
    pub fn config_dir() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME))
            .ok_or_else(|| {
                ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string())
            })
    }

    /// Default config file path
    pub fn default_path() -> ConfigResult<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Preference file to open for this configuration
    pub fn preferences_file(&self) -> ConfigResult<PathBuf> {
        match &self.preferences_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join(PREFERENCES_FILE_NAME)),
        }
    }

    /// Load config from `path`, or defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> ConfigResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let telephony = &self.telephony;

        if telephony.phone_count == 0 || telephony.phone_count > MAX_PHONE_COUNT {
            return Err(ConfigError::ValueOutOfRange {
                key: "telephony.phone_count".to_string(),
                value: telephony.phone_count.to_string(),
            });
        }

        if telephony.default_slot >= telephony.phone_count {
            return Err(ConfigError::ValueOutOfRange {
                key: "telephony.default_slot".to_string(),
                value: telephony.default_slot.to_string(),
            });
        }

        for country in &telephony.sim_countries {
            let valid = country.is_empty()
                || (country.len() == 2 && country.chars().all(|c| c.is_ascii_lowercase()));
            if !valid {
                return Err(ConfigError::ValueOutOfRange {
                    key: "telephony.sim_countries".to_string(),
                    value: country.clone(),
                });
            }
        }

        Ok(())
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellbroadcast_core::PhoneType;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.policy.show_cmas_settings);
        assert!(!config.developer_settings_enabled);
    }

    #[test]
    fn test_toml_round_trip_through_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.policy.show_india_settings = true;
        config.telephony = StaticTelephony::new()
            .with_phone_type(PhoneType::Cdma)
            .with_phone_count(2)
            .with_sim_country(1, "in");

        config.save_to_file(&path).expect("save");
        let loaded = AppConfig::load_from_file(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "developer_settings_enabled = true\n[policy]\nshow_etws_settings = true\n",
        )
        .expect("write");

        let config = AppConfig::load_from_file(&path).expect("load");
        assert!(config.developer_settings_enabled);
        assert!(config.policy.show_etws_settings);
        assert!(config.policy.show_cmas_settings);
        assert_eq!(config.telephony.phone_count, 1);
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let result = AppConfig::load_from_file(Path::new("config.yaml"));
        // Missing file is reported before the format check
        assert!(result.is_err());

        let result = AppConfig::default().save_to_file(Path::new("config.yaml"));
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_validation_rejects_bad_telephony() {
        let mut config = AppConfig::default();
        config.telephony.phone_count = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValueOutOfRange { .. })
        ));

        let mut config = AppConfig::default();
        config.telephony.default_slot = 1;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.telephony.sim_countries = vec!["BRA".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config =
            AppConfig::load_or_default(&dir.path().join("absent.toml")).expect("defaults");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_explicit_preferences_path_wins() {
        let config = AppConfig {
            preferences_path: Some(PathBuf::from("/tmp/prefs.json")),
            ..AppConfig::default()
        };
        assert_eq!(
            config.preferences_file().expect("path"),
            PathBuf::from("/tmp/prefs.json")
        );
    }
}
