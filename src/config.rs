//! Scan configuration
//!
//! Settings for one scan: the root directory, the rule set to use, the
//! root-identifier surface and the content-matching size limit. Environment
//! variables provide overrides:
//!
//! - `TECHSCOPE_MAX_CONTENT_BYTES`: content-matching size limit - default: 1 MiB
//! - `TECHSCOPE_ROOT_ID`: explicit root identifier override
//! - `TECHSCOPE_LOG_LEVEL` / `TECHSCOPE_LOG_JSON`: see [`crate::util::logging`]

use crate::identity::RootIdOptions;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Default content-matching size limit
pub const DEFAULT_MAX_CONTENT_BYTES: u64 = 1024 * 1024;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("scan root does not exist: {0}")]
    MissingRoot(PathBuf),

    #[error("scan root is not a directory: {0}")]
    RootNotADirectory(PathBuf),

    #[error("root identifier override is empty")]
    EmptyRootIdOverride,

    #[error("failed to parse {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Configuration for one scan
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Directory to scan
    pub root: PathBuf,
    /// Rule file replacing the built-in rule set
    pub rules_file: Option<PathBuf>,
    /// Explicit root identifier; highest precedence
    pub root_id_override: Option<String>,
    /// Version-control remote URL for deterministic root IDs
    pub remote_url: Option<String>,
    /// Sub-path of the scan root within the repository
    pub repo_subpath: Option<String>,
    /// Refuse the random root-ID fallback
    pub require_deterministic: bool,
    /// Files larger than this are excluded from content matching
    pub max_content_bytes: u64,
}

impl ScanConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            rules_file: None,
            root_id_override: None,
            remote_url: None,
            repo_subpath: None,
            require_deterministic: false,
            max_content_bytes: DEFAULT_MAX_CONTENT_BYTES,
        }
    }

    /// Apply `TECHSCOPE_*` environment overrides on top of the current
    /// values.
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(value) = env::var("TECHSCOPE_MAX_CONTENT_BYTES") {
            self.max_content_bytes =
                value
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidValue {
                        name: "TECHSCOPE_MAX_CONTENT_BYTES",
                        value,
                    })?;
        }
        if self.root_id_override.is_none() {
            if let Ok(value) = env::var("TECHSCOPE_ROOT_ID") {
                self.root_id_override = Some(value);
            }
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.root.exists() {
            return Err(ConfigError::MissingRoot(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(ConfigError::RootNotADirectory(self.root.clone()));
        }
        if let Some(override_id) = &self.root_id_override {
            if override_id.trim().is_empty() {
                return Err(ConfigError::EmptyRootIdOverride);
            }
        }
        Ok(())
    }

    /// Root-identifier resolution inputs derived from this configuration.
    pub fn root_id_options(&self) -> RootIdOptions {
        RootIdOptions {
            override_id: self.root_id_override.clone(),
            remote_url: self.remote_url.clone(),
            repo_subpath: self.repo_subpath.clone(),
            scan_path: Some(self.root.clone()),
            require_deterministic: self.require_deterministic,
        }
    }
}
