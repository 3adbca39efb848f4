//! Credential types
//!
//! Credentials are passed explicitly into the extractor; there is no
//! process-wide lookup by key.

use crate::error::{Error, Result};
use std::fmt;
use url::Url;

/// Environment variable holding the API base URL
pub const URL_ENV: &str = "VIDCLUB_URL";

/// Environment variable holding the bearer token
pub const TOKEN_ENV: &str = "VIDCLUB_TOKEN";

/// Validated API credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Base URL, always ending with `/`
    base_url: String,
    /// Bearer token
    token: String,
}

impl Credentials {
    /// Validate and build credentials.
    ///
    /// Both values must be present and non-blank, and the base URL must be an
    /// absolute http(s) URL. A trailing `/` is added when missing so endpoint
    /// names can be appended directly.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim().to_string();
        let token = token.into().trim().to_string();

        if base_url.is_empty() || token.is_empty() {
            return Err(Error::credential("'url' and 'token' credentials are required"));
        }

        let parsed = Url::parse(&base_url)
            .map_err(|e| Error::credential(format!("invalid base url '{base_url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::credential(format!(
                "base url must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        let base_url = if base_url.ends_with('/') {
            base_url
        } else {
            format!("{base_url}/")
        };

        Ok(Self { base_url, token })
    }

    /// Build credentials from optional parts, as read from a config file
    pub fn from_parts(base_url: Option<String>, token: Option<String>) -> Result<Self> {
        match (base_url, token) {
            (Some(url), Some(token)) => Self::new(url, token),
            (None, None) => Err(Error::credential("Missing credentials.")),
            _ => Err(Error::credential("'url' and 'token' credentials are required")),
        }
    }

    /// API base URL (ends with `/`)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Value for the `Authorization` header
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("token", &"***")
            .finish()
    }
}
