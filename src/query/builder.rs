//! Query builder implementation

use super::types::{PageToken, RequestDescriptor};
use crate::auth::Credentials;
use crate::error::{Error, Result};
use crate::partition::DateWindow;
use crate::types::{Region, Source};
use url::Url;

/// Date format used in query parameters
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parameters the builder owns; they are replaced when following a next-page URL
const FILTER_PARAMS: [&str; 4] = ["from", "to", "limit", "region"];

/// Builds request descriptors against one API base URL
#[derive(Debug, Clone)]
pub struct QueryBuilder<'a> {
    credentials: &'a Credentials,
}

impl<'a> QueryBuilder<'a> {
    /// Create a builder for the given credentials
    pub fn new(credentials: &'a Credentials) -> Self {
        Self { credentials }
    }

    /// Build a request for an endpoint given by name.
    ///
    /// Fails with `UnsupportedEndpoint` for names outside the fixed set.
    pub fn build_named(
        &self,
        endpoint: &str,
        window: &DateWindow,
        token: &PageToken,
        items_per_page: u32,
        region: &Region,
    ) -> Result<RequestDescriptor> {
        let source: Source = endpoint.parse()?;
        self.build(source, window, token, items_per_page, region)
    }

    /// Build a request for one page of one date window
    pub fn build(
        &self,
        source: Source,
        window: &DateWindow,
        token: &PageToken,
        items_per_page: u32,
        region: &Region,
    ) -> Result<RequestDescriptor> {
        let url = if source.is_date_filtered() {
            self.filtered_url(source, window, token, items_per_page, region)?
        } else {
            let mut url = self.endpoint_url(source)?;
            url.query_pairs_mut()
                .append_pair("language", "en")
                .append_pair("type", "question");
            url
        };

        Ok(RequestDescriptor::get(url)
            .with_header("Authorization", self.credentials.bearer_header())
            .with_header("Content-Type", "application/json"))
    }

    fn endpoint_url(&self, source: Source) -> Result<Url> {
        let base = Url::parse(self.credentials.base_url())?;
        Ok(base.join(source.as_str())?)
    }

    fn filtered_url(
        &self,
        source: Source,
        window: &DateWindow,
        token: &PageToken,
        items_per_page: u32,
        region: &Region,
    ) -> Result<Url> {
        let filters = [
            ("from", window.from.format(DATE_FORMAT).to_string()),
            ("to", window.to.format(DATE_FORMAT).to_string()),
            ("limit", items_per_page.to_string()),
            ("region", region.as_str().to_string()),
        ];

        match token {
            PageToken::Cursor(cursor) if is_absolute_url(cursor) => {
                // Next-page URL form: keep its own parameters, re-apply the filters
                let mut url = Url::parse(cursor)?;
                let base = Url::parse(self.credentials.base_url())?;
                if url.origin() != base.origin() {
                    return Err(Error::decode(format!(
                        "next-page URL '{cursor}' is not on the API origin {}",
                        base.origin().ascii_serialization()
                    )));
                }
                let kept: Vec<(String, String)> = url
                    .query_pairs()
                    .filter(|(k, _)| !FILTER_PARAMS.contains(&k.as_ref()))
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect();
                url.query_pairs_mut()
                    .clear()
                    .extend_pairs(kept)
                    .extend_pairs(filters);
                Ok(url)
            }
            _ => {
                let mut url = self.endpoint_url(source)?;
                {
                    let mut pairs = url.query_pairs_mut();
                    pairs.extend_pairs(filters);
                    match token {
                        PageToken::PageNumber(page) => {
                            pairs.append_pair("page", &page.to_string());
                        }
                        PageToken::Cursor(cursor) => {
                            pairs.append_pair("cursor", cursor);
                        }
                        PageToken::None => {}
                    }
                }
                Ok(url)
            }
        }
    }
}

fn is_absolute_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}
