//! Client configuration
//!
//! `ClientConfig` is the option bundle accepted by the admin client. All three
//! settings are optional until validated so that every missing one can be
//! reported at once. `ConfigFile` reads named profiles from a TOML file; it
//! never writes.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Names of the required options, in reporting order
pub const REQUIRED_OPTIONS: [&str; 3] = ["apiUrl", "apiKey", "secretKey"];

/// Option bundle for [`AdminClient`](crate::AdminClient)
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Base URL of the admin API, e.g. `https://rgw.example.com/admin`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Access key of the admin user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Secret key of the admin user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
}

impl ClientConfig {
    /// Create a config with all required fields set
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            api_url: Some(api_url.into()),
            api_key: Some(api_key.into()),
            secret_key: Some(secret_key.into()),
        }
    }

    /// Fill unset fields from `other`
    pub fn or(self, other: ClientConfig) -> Self {
        Self {
            api_url: self.api_url.or(other.api_url),
            api_key: self.api_key.or(other.api_key),
            secret_key: self.secret_key.or(other.secret_key),
        }
    }

    /// Names of the required options that are not set
    pub fn missing_options(&self) -> Vec<&'static str> {
        let present = [
            self.api_url.is_some(),
            self.api_key.is_some(),
            self.secret_key.is_some(),
        ];

        REQUIRED_OPTIONS
            .iter()
            .zip(present)
            .filter(|(_, set)| !set)
            .map(|(name, _)| *name)
            .collect()
    }

    /// Check that every required option is present
    ///
    /// Presence is all that is checked; an empty string counts as set.
    pub fn validate(self) -> Result<ValidatedConfig> {
        let missing = self.missing_options();

        let (Some(api_url), Some(api_key), Some(secret_key)) =
            (self.api_url, self.api_key, self.secret_key)
        else {
            return Err(Error::Config(format!(
                "Required option(s) not defined: {}",
                missing.join(",")
            )));
        };

        Ok(ValidatedConfig {
            api_url,
            credentials: Credentials::new(api_key, secret_key),
        })
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Access key / secret key pair used for signing
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
}

impl Credentials {
    /// Create a credential pair
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Access key ID
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Secret key used as the HMAC key
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Configuration that passed [`ClientConfig::validate`]
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    /// Base URL of the admin API
    pub api_url: String,
    /// Signing credentials
    pub credentials: Credentials,
}

/// Read-only TOML configuration file holding named profiles
///
/// ```toml
/// [profiles.default]
/// apiUrl = "http://localhost:8080/admin"
/// apiKey = "admin"
/// secretKey = "secret"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Profiles keyed by name
    #[serde(default)]
    pub profiles: BTreeMap<String, ClientConfig>,
}

impl ConfigFile {
    /// Default config path: `<config_dir>/rgw-admin/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not determine config directory".into()))?;
        Ok(config_dir.join("rgw-admin").join("config.toml"))
    }

    /// Parse a config file from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config file from disk
    ///
    /// A missing file yields an empty configuration.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Get a profile by name
    pub fn profile(&self, name: &str) -> Result<ClientConfig> {
        self.profiles
            .get(name)
            .cloned()
            .ok_or_else(|| Error::Config(format!("Profile not found: {name}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_complete_config() {
        let config = ClientConfig::new("http://localhost:8080/admin", "access", "secret");
        let validated = config.validate().unwrap();
        assert_eq!(validated.api_url, "http://localhost:8080/admin");
        assert_eq!(validated.credentials.access_key(), "access");
        assert_eq!(validated.credentials.secret_key(), "secret");
    }

    #[test]
    fn test_validate_lists_every_missing_option() {
        let config = ClientConfig {
            api_key: Some("access".into()),
            ..Default::default()
        };

        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: Required option(s) not defined: apiUrl,secretKey"
        );
    }

    #[test]
    fn test_validate_empty_config() {
        let err = ClientConfig::default().validate().unwrap_err();
        assert!(
            err.to_string()
                .ends_with("Required option(s) not defined: apiUrl,apiKey,secretKey")
        );
    }

    #[test]
    fn test_config_or_fills_gaps() {
        let flags = ClientConfig {
            api_url: Some("http://flag".into()),
            ..Default::default()
        };
        let profile = ClientConfig::new("http://profile", "key", "secret");

        let merged = flags.or(profile);
        assert_eq!(merged.api_url.as_deref(), Some("http://flag"));
        assert_eq!(merged.api_key.as_deref(), Some("key"));
        assert_eq!(merged.secret_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ClientConfig::new("http://localhost", "access", "topsecret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("topsecret"));

        let creds = Credentials::new("access", "topsecret");
        let debug = format!("{creds:?}");
        assert!(debug.contains("access"));
        assert!(!debug.contains("topsecret"));
    }

    #[test]
    fn test_config_file_profiles() {
        let file = ConfigFile::from_toml_str(
            r#"
            [profiles.default]
            apiUrl = "http://localhost:8080/admin"
            apiKey = "admin"
            secretKey = "secret"

            [profiles.partial]
            apiUrl = "http://other/admin"
            "#,
        )
        .unwrap();

        let default = file.profile("default").unwrap();
        assert!(default.missing_options().is_empty());

        let partial = file.profile("partial").unwrap();
        assert_eq!(partial.missing_options(), vec!["apiKey", "secretKey"]);

        assert!(matches!(file.profile("nope"), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let file = ConfigFile::load(&temp_dir.path().join("config.toml")).unwrap();
        assert!(file.profiles.is_empty());
    }

    #[test]
    fn test_load_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[profiles.ceph]\napiUrl = \"http://ceph/admin\"\napiKey = \"a\"\nsecretKey = \"s\"\n",
        )
        .unwrap();

        let file = ConfigFile::load(&path).unwrap();
        let profile = file.profile("ceph").unwrap();
        assert_eq!(profile.api_url.as_deref(), Some("http://ceph/admin"));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "profiles = [").unwrap();

        assert!(matches!(ConfigFile::load(&path), Err(Error::TomlParse(_))));
    }
}
