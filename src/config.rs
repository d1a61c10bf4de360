use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::update::types::HostEnvironment;

// =============================================================================
// Cache-related constants
// =============================================================================

/// Lifetime of a cached update check (40 minutes)
pub const UPDATE_CACHE_TTL: Duration = Duration::from_secs(40 * 60);

/// Namespace prefix for update-check cache keys
pub const UPDATE_CACHE_NAMESPACE: &str = "update_check";

// =============================================================================
// Remote API defaults
// =============================================================================

/// Channel sent to the remote API, identifying the calling host ecosystem
pub const DEFAULT_CHANNEL: &str = "wp";

/// Timeout for remote requests in milliseconds (15 seconds)
pub const DEFAULT_API_TIMEOUT_MS: u64 = 15_000;

/// chrono format used for license expiry dates in notices
pub const DEFAULT_DATE_FORMAT: &str = "%B %-d, %Y";

/// Updater configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdaterConfig {
    pub api: ApiConfig,
    pub channel: String,
    pub date_format: String,
    pub environment: HostEnvironment,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            channel: DEFAULT_CHANNEL.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            environment: HostEnvironment::default(),
        }
    }
}

/// Remote API configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiConfig {
    /// Base URL of the license server REST namespace
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_ms: DEFAULT_API_TIMEOUT_MS,
        }
    }
}

impl UpdaterConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Returns the path to the data directory for plugin-update-checker.
/// Uses $XDG_DATA_HOME/plugin-update-checker if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/plugin-update-checker,
/// or ./plugin-update-checker if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the cache database file.
pub fn db_path() -> PathBuf {
    data_dir().join("updates.db")
}

/// Returns the directory holding log files.
pub fn log_path() -> PathBuf {
    data_dir().join("logs")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("plugin-update-checker")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn updater_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<UpdaterConfig>(json!({
            "api": {
                "baseUrl": "https://example.com/wp-json/dlm/v1"
            }
        }))
        .unwrap();

        assert_eq!(result.api.base_url, "https://example.com/wp-json/dlm/v1");
        assert_eq!(result.api.timeout_ms, DEFAULT_API_TIMEOUT_MS);
        assert_eq!(result.channel, DEFAULT_CHANNEL);
        assert_eq!(result.date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(result.environment, HostEnvironment::default());
    }

    #[test]
    fn updater_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<UpdaterConfig>(json!({
            "api": {
                "baseUrl": "https://licenses.test/api",
                "timeoutMs": 2000
            },
            "channel": "cli",
            "dateFormat": "%Y-%m-%d",
            "environment": {
                "hostVersion": "6.4.2",
                "runtimeVersion": "8.2.12",
                "serverSoftware": "nginx/1.25.3"
            }
        }))
        .unwrap();

        assert_eq!(
            result,
            UpdaterConfig {
                api: ApiConfig {
                    base_url: "https://licenses.test/api".to_string(),
                    timeout_ms: 2000,
                },
                channel: "cli".to_string(),
                date_format: "%Y-%m-%d".to_string(),
                environment: HostEnvironment {
                    host_version: "6.4.2".to_string(),
                    runtime_version: "8.2.12".to_string(),
                    server_software: Some("nginx/1.25.3".to_string()),
                },
            }
        );
    }

    #[test]
    fn update_cache_ttl_is_forty_minutes() {
        assert_eq!(UPDATE_CACHE_TTL.as_secs(), 2400);
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/plugin-update-checker"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(
            path,
            PathBuf::from("/home/user/.local/share/plugin-update-checker")
        );
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./plugin-update-checker"));
    }
}
