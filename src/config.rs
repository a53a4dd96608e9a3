use crate::constants::{BASE_URL, DEFAULT_AUTH_FILE, DEFAULT_OUT_DIR, DEFAULT_TIMEOUT_SECS};
use crate::errors::{AppError, AppResult};
use crate::models::CollisionPolicy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Resolved configuration with all values filled in (no Options).
///
/// Deserializable from TOML; every key is optional and falls back to the
/// default shown in [`ResolvedConfig::default`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolvedConfig {
    /// Base URL of the service API, every endpoint path is appended to it
    pub base_url: String,
    /// JSON file holding the login credentials
    pub auth_file: PathBuf,
    /// Existing directory the PDFs are written to
    pub out_dir: PathBuf,
    /// Total deadline per request in seconds.
    ///
    /// The deadline covers connecting, the response headers and streaming the
    /// whole body, so large downloads over slow links need a higher value.
    pub timeout_secs: u64,
    /// Behavior when two documents map to the same file name
    pub on_collision: CollisionPolicy,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            auth_file: PathBuf::from(DEFAULT_AUTH_FILE),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            on_collision: CollisionPolicy::default(),
        }
    }
}

impl ResolvedConfig {
    /// Loads and validates configuration from a TOML file.
    ///
    /// Unknown keys are rejected to catch typos.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file cannot be read, the TOML is malformed,
    /// or [`ResolvedConfig::validate`] fails.
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        let config: ResolvedConfig = toml::from_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Checks values that the type system cannot express.
    pub fn validate(&self) -> AppResult<()> {
        if self.timeout_secs == 0 {
            return Err(AppError::Config(
                "Timeout must be greater than 0 seconds".into(),
            ));
        }

        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "Base URL must use http or https, got '{}'",
                url.scheme()
            )));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Ensures the output directory exists; it is never created implicitly.
    pub fn check_out_dir(&self) -> AppResult<()> {
        if self.out_dir.is_dir() {
            Ok(())
        } else {
            Err(AppError::Config(format!(
                "Output directory {} does not exist or is not a directory",
                self.out_dir.display()
            )))
        }
    }
}
