//! Platform configuration
//!
//! The configuration file is the JSON block the host hands the platform:
//!
//! ```json
//! {
//!   "devices": [
//!     { "ipAddress": "192.168.1.40", "channels": ["Netflix", "YouTube"] },
//!     { "ipAddress": "192.168.1.41", "disableNavigationButtons": true }
//!   ]
//! }
//! ```
//!
//! `devices` may be omitted entirely, in which case only discovered devices
//! are exposed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// One device the bridge should expose.
///
/// Comes from configuration or from discovery (address only). Immutable once
/// handed to the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescriptor {
    pub ip_address: String,

    /// Application names to expose as channel switches; all when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<Vec<String>>,

    #[serde(default)]
    pub disable_navigation_buttons: bool,
}

impl DeviceDescriptor {
    /// Descriptor for a device known only by address
    pub fn from_ip(ip_address: impl Into<String>) -> Self {
        Self {
            ip_address: ip_address.into(),
            channels: None,
            disable_navigation_buttons: false,
        }
    }
}

/// Tunables with defaults matching the device protocol's behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeSettings {
    /// Length of the SSDP discovery window
    pub discovery_timeout_ms: u64,

    /// Upper bound on a channel switch read
    pub active_query_timeout_ms: u64,

    /// Key-presses sent per volume up/down activation
    pub volume_repeat: usize,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            discovery_timeout_ms: 1000,
            active_query_timeout_ms: 5000,
            volume_repeat: 10,
        }
    }
}

impl BridgeSettings {
    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery_timeout_ms)
    }

    pub fn active_query_timeout(&self) -> Duration {
        Duration::from_millis(self.active_query_timeout_ms)
    }
}

/// Top-level platform configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformConfig {
    #[serde(default)]
    pub devices: Vec<DeviceDescriptor>,

    #[serde(flatten)]
    pub settings: BridgeSettings,
}

impl PlatformConfig {
    /// Parse and validate configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: PlatformConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Reject values the bridge cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, device) in self.devices.iter().enumerate() {
            if device.ip_address.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "devices[{}] has an empty ipAddress",
                    index
                )));
            }
        }

        if self.settings.volume_repeat == 0 {
            return Err(ConfigError::Invalid(
                "volumeRepeat must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// `$CONFIG_DIR/roku-bridge/config.json`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("roku-bridge").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "platform": "RokuHomebridge",
            "devices": [
                { "ipAddress": "192.168.1.40", "channels": ["Netflix", "YouTube"] },
                { "ipAddress": "192.168.1.41", "disableNavigationButtons": true }
            ]
        }"#;

        let config = PlatformConfig::from_json_str(json).unwrap();
        assert_eq!(config.devices.len(), 2);
        assert_eq!(
            config.devices[0].channels,
            Some(vec!["Netflix".to_string(), "YouTube".to_string()])
        );
        assert!(!config.devices[0].disable_navigation_buttons);
        assert!(config.devices[1].disable_navigation_buttons);
        assert_eq!(config.devices[1].channels, None);
        assert_eq!(config.settings, BridgeSettings::default());
    }

    #[test]
    fn test_missing_devices_is_valid() {
        let config = PlatformConfig::from_json_str("{}").unwrap();
        assert!(config.devices.is_empty());
        assert_eq!(config.settings.discovery_timeout(), Duration::from_millis(1000));
    }

    #[test]
    fn test_settings_overrides() {
        let json = r#"{ "discoveryTimeoutMs": 2500, "volumeRepeat": 4 }"#;
        let config = PlatformConfig::from_json_str(json).unwrap();
        assert_eq!(config.settings.discovery_timeout_ms, 2500);
        assert_eq!(config.settings.volume_repeat, 4);
        assert_eq!(config.settings.active_query_timeout_ms, 5000);
    }

    #[test]
    fn test_empty_ip_is_rejected() {
        let json = r#"{ "devices": [{ "ipAddress": "  " }] }"#;
        assert!(matches!(
            PlatformConfig::from_json_str(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            PlatformConfig::from_json_str("{ devices: "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "devices": [{{ "ipAddress": "10.0.0.5" }}] }}"#).unwrap();

        let config = PlatformConfig::load(file.path()).unwrap();
        assert_eq!(config.devices, vec![DeviceDescriptor::from_ip("10.0.0.5")]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = PlatformConfig::load("/nonexistent/roku-bridge.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_default_config_path_shape() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("roku-bridge/config.json"));
        }
    }
}
