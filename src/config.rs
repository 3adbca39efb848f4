//! Extractor configuration
//!
//! This module contains the configuration structures used to set up an
//! extractor from a YAML (or JSON) file. Every section has defaults, so an
//! empty file is a valid configuration as long as credentials come from the
//! environment.

use crate::auth::Credentials;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{BackoffType, IfEmpty, Region};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete extractor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractorConfig {
    /// API credentials; may be left out and read from the environment
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpSettings,

    /// Extraction defaults
    #[serde(default)]
    pub extraction: ExtractionSettings,
}

impl ExtractorConfig {
    /// Load a config file. Files ending in `.json` are parsed as JSON,
    /// everything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// Parse a YAML config
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.extraction.max_span_days == 0 {
            return Err(Error::config("extraction.max_span_days must be at least 1"));
        }
        if self.extraction.items_per_page == 0 {
            return Err(Error::config("extraction.items_per_page must be at least 1"));
        }
        if self.extraction.source_name.trim().is_empty() {
            return Err(Error::config("extraction.source_name cannot be empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::config("http.timeout_secs must be at least 1"));
        }
        Ok(())
    }

    /// Credentials written in the config, and nothing else
    pub fn credentials(&self) -> Result<Credentials> {
        self.credentials.to_credentials()
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Raw credentials as written in the config file
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsConfig {
    /// API base URL
    #[serde(default, alias = "url")]
    pub base_url: Option<String>,

    /// Bearer token
    #[serde(default)]
    pub token: Option<String>,
}

impl CredentialsConfig {
    /// Check if neither value is set
    pub fn is_empty(&self) -> bool {
        self.base_url.is_none() && self.token.is_none()
    }

    /// Validate into credentials
    pub fn to_credentials(&self) -> Result<Credentials> {
        Credentials::from_parts(self.base_url.clone(), self.token.clone())
    }
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum number of retries
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff strategy between retries
    #[serde(default)]
    pub backoff: BackoffType,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Verify server TLS certificates
    #[serde(default = "default_true")]
    pub verify_tls: bool,

    /// Request rate limit; 0 disables limiting
    #[serde(default = "default_rps")]
    pub requests_per_second: u32,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            verify_tls: default_true(),
            requests_per_second: default_rps(),
        }
    }
}

impl HttpSettings {
    /// Build the HTTP client configuration
    pub fn to_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries)
            .backoff(
                self.backoff,
                Duration::from_millis(self.initial_backoff_ms),
                Duration::from_millis(self.max_backoff_ms),
            )
            .verify_tls(self.verify_tls);

        builder = match RateLimiterConfig::per_second(self.requests_per_second) {
            Some(limit) => builder.rate_limit(limit),
            None => builder.no_rate_limit(),
        };

        builder.build()
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_ms() -> u64 {
    60000
}

fn default_true() -> bool {
    true
}

fn default_rps() -> u32 {
    10
}

// ============================================================================
// Extraction
// ============================================================================

/// Extraction defaults, used when a request does not override them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractionSettings {
    /// Maximum days per date sub-window
    #[serde(default = "default_max_span_days")]
    pub max_span_days: u32,

    /// Page size sent as `limit`
    #[serde(default = "default_items_per_page")]
    pub items_per_page: u32,

    /// Region filter
    #[serde(default)]
    pub region: Region,

    /// Behaviour on an empty final table
    #[serde(default)]
    pub if_empty: IfEmpty,

    /// Value of the source metadata column
    #[serde(default = "default_source_name")]
    pub source_name: String,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            max_span_days: default_max_span_days(),
            items_per_page: default_items_per_page(),
            region: Region::default(),
            if_empty: IfEmpty::default(),
            source_name: default_source_name(),
        }
    }
}

fn default_max_span_days() -> u32 {
    30
}

fn default_items_per_page() -> u32 {
    100
}

fn default_source_name() -> String {
    "vidclub".to_string()
}
