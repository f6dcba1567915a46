//! Application configuration management.

use std::fmt;
use std::path::PathBuf;

use config::ConfigError;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerSettings,
    /// Object storage configuration.
    pub storage: StorageSettings,
    /// Folder listing and download configuration.
    #[serde(default)]
    pub listing: ListingSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Object storage credentials and target bucket.
#[derive(Clone, Deserialize)]
pub struct StorageSettings {
    /// Bucket region, e.g. `eu-central-1`.
    pub region: String,
    /// Access key ID.
    pub access_key: String,
    /// Secret access key.
    pub secret_key: String,
    /// Bucket every request is served from.
    pub bucket_name: String,
    /// Custom endpoint for S3-compatible providers (R2, MinIO).
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl fmt::Debug for StorageSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageSettings")
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("bucket_name", &self.bucket_name)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Folder listing and download configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingSettings {
    /// Maximum number of keys returned per listing page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Root directory for per-download scratch directories.
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            scratch_dir: default_scratch_dir(),
        }
    }
}

fn default_page_size() -> usize {
    100
}

fn default_scratch_dir() -> PathBuf {
    PathBuf::from("temp")
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default.toml`,
    /// `config/{RUN_MODE}.toml`, then `BUCKETFRONT__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BUCKETFRONT").separator("__"))
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Rejects settings that would only fail later, at request time.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("storage.region", &self.storage.region),
            ("storage.access_key", &self.storage.access_key),
            ("storage.secret_key", &self.storage.secret_key),
            ("storage.bucket_name", &self.storage.bucket_name),
        ];

        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Message(format!("{key} must not be blank")));
            }
        }

        if self.listing.page_size == 0 {
            return Err(ConfigError::Message(
                "listing.page_size must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
