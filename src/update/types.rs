//! Product, environment and update record types

use serde::{Deserialize, Serialize};

use crate::update::error::ConfigError;

/// Identity of the installed product being checked for updates
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductEntity {
    /// Identifier of the product on the license server
    pub id: String,
    /// Host slug (e.g., "my-plugin")
    pub slug: String,
    /// Host basename (e.g., "my-plugin/my-plugin.php")
    pub basename: String,
    /// Version currently installed
    pub current_version: String,
    /// Activation token proving license ownership
    pub activation_token: Option<String>,
    pub purchase_url: String,
    pub settings_url: String,
}

impl ProductEntity {
    /// Returns the activation token when one is set and non-blank
    pub fn token(&self) -> Option<&str> {
        self.activation_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
    }

    /// Ensure the fields the updater relies on are present
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("id", &self.id),
            ("slug", &self.slug),
            ("basename", &self.basename),
            ("currentVersion", &self.current_version),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField(name));
            }
        }

        Ok(())
    }
}

/// Host and runtime metadata forwarded to the license server with downloads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostEnvironment {
    /// Version of the host application
    pub host_version: String,
    /// Version of the runtime executing the host
    pub runtime_version: String,
    /// Web server software string, when known
    pub server_software: Option<String>,
}

/// Update entry handed to the host when a newer version is available
///
/// Field names follow the host's update transient shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRecord {
    pub slug: String,
    /// Host basename of the product
    pub plugin: String,
    pub url: String,
    pub new_version: String,
    /// Highest host version the release was tested with
    pub tested: String,
    /// Download URL enriched with environment metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

/// Outcome of an update check, as stored in the cache
///
/// `UpToDate` is cached explicitly so that "no update" answers are throttled
/// the same way as positive ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateCheck {
    Available(UpdateRecord),
    UpToDate,
}

impl UpdateCheck {
    pub fn into_record(self) -> Option<UpdateRecord> {
        match self {
            UpdateCheck::Available(record) => Some(record),
            UpdateCheck::UpToDate => None,
        }
    }
}

impl From<Option<UpdateRecord>> for UpdateCheck {
    fn from(record: Option<UpdateRecord>) -> Self {
        match record {
            Some(record) => UpdateCheck::Available(record),
            None => UpdateCheck::UpToDate,
        }
    }
}

/// License status reported by the license server for an activation token
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LicenseState {
    pub is_expired: bool,
    pub expires_at: Option<String>,
}
