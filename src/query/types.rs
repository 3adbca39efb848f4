//! Request descriptor and page token types

use reqwest::Method;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Token addressing one page of a paginated endpoint
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageToken {
    /// First request of a walk, or an unpaginated endpoint
    #[default]
    None,
    /// 1-based page number
    PageNumber(u32),
    /// Opaque cursor returned by the API. May be a full next-page URL.
    Cursor(String),
}

impl PageToken {
    /// Check if this is the empty token
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// A fully qualified request, ready for the transport
#[derive(Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// HTTP method
    pub method: Method,
    /// Absolute URL including the query string
    pub url: Url,
    /// Request headers
    pub headers: BTreeMap<String, String>,
}

impl RequestDescriptor {
    /// Create a GET descriptor without headers
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            headers: BTreeMap::new(),
        }
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Look up a query parameter by name
    pub fn query_param(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

impl fmt::Display for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: BTreeMap<&str, &str> = self
            .headers
            .iter()
            .map(|(k, v)| {
                if k.eq_ignore_ascii_case("authorization") {
                    (k.as_str(), "***")
                } else {
                    (k.as_str(), v.as_str())
                }
            })
            .collect();

        f.debug_struct("RequestDescriptor")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &headers)
            .finish()
    }
}
