//! Extraction engine module
//!
//! Main extraction loop and orchestration.
//!
//! # Overview
//!
//! The engine module provides:
//! - `Extractor` - Drives partition, walk, aggregate, empty-result policy and
//!   metadata injection for one request
//! - `ExtractRequest` - Validated caller input
//! - `Extraction` - Final table with statistics and messages
//! - `MetadataInjector` - Provenance columns added to non-empty results

mod metadata;
mod types;

pub use metadata::{IngestionMetadata, MetadataInjector, DOWNLOADED_AT_COLUMN, SOURCE_COLUMN};
pub use types::{ExtractRequest, ExtractStats, Extraction, LogLevel, Message};

use crate::auth::Credentials;
use crate::config::{ExtractionSettings, ExtractorConfig};
use crate::error::Result;
use crate::http::{HttpClient, Transport};
use crate::pagination::PaginationWalker;
use crate::partition::{partition, DateWindow};
use crate::policy::EmptyResultPolicy;
use crate::query::QueryBuilder;
use crate::table::Aggregator;
use std::time::Instant;
use tracing::{debug, info};

/// Extraction facade over one API
pub struct Extractor {
    /// Validated credentials
    credentials: Credentials,
    /// Transport used by every walk
    transport: Box<dyn Transport>,
    /// Defaults for sub-window size and the source name
    settings: ExtractionSettings,
    /// Provenance columns
    metadata: Box<dyn MetadataInjector>,
}

impl Extractor {
    /// Create an extractor from a configuration, using the HTTP transport.
    ///
    /// Credentials must be present in `config`; the environment is never read.
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        Self::with_credentials(config, config.credentials()?)
    }

    /// Create an extractor over the HTTP transport with credentials obtained
    /// by the caller. The `credentials` section of `config` is ignored.
    pub fn with_credentials(config: &ExtractorConfig, credentials: Credentials) -> Result<Self> {
        config.validate()?;
        let client = HttpClient::with_config(config.http.to_client_config())?;

        Ok(Self::with_transport(credentials, client).with_settings(config.extraction.clone()))
    }

    /// Create an extractor over any transport
    pub fn with_transport(credentials: Credentials, transport: impl Transport + 'static) -> Self {
        Self {
            credentials,
            transport: Box::new(transport),
            settings: ExtractionSettings::default(),
            metadata: Box::new(IngestionMetadata::new()),
        }
    }

    /// Set extraction defaults
    #[must_use]
    pub fn with_settings(mut self, settings: ExtractionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Set the metadata injector
    #[must_use]
    pub fn with_metadata(mut self, metadata: impl MetadataInjector + 'static) -> Self {
        self.metadata = Box::new(metadata);
        self
    }

    /// Extraction defaults
    pub fn settings(&self) -> &ExtractionSettings {
        &self.settings
    }

    /// Build a request from caller strings, filling paging, region and
    /// empty-result mode from the extractor defaults when not given
    pub fn request(
        &self,
        source: &str,
        from_date: &str,
        to_date: Option<&str>,
    ) -> Result<ExtractRequest> {
        ExtractRequest::parse(
            source,
            from_date,
            to_date,
            self.settings.items_per_page,
            self.settings.region.as_str(),
            &self.settings.if_empty.to_string(),
        )
    }

    /// Run one extraction.
    ///
    /// Windows and pages are fetched strictly in order. The first failed
    /// request fails the whole call; no partial table is returned.
    pub async fn extract(&self, request: &ExtractRequest) -> Result<Extraction> {
        request.validate()?;

        let start = Instant::now();
        let mut stats = ExtractStats::new();
        let mut messages = Vec::new();

        let windows = self.windows(request)?;
        let source = request.source;

        info!(
            "Extracting '{}' for {} in {} window(s)",
            source,
            request.window,
            windows.len()
        );
        messages.push(Message::info(format!(
            "Starting extraction for source: {source}"
        )));

        let builder = QueryBuilder::new(&self.credentials);
        let walker = PaginationWalker::new(
            self.transport.as_ref(),
            builder,
            source,
            request.items_per_page,
            &request.region,
        );

        let mut aggregator = Aggregator::new();
        for window in &windows {
            let walk = walker.walk(window).await?;
            messages.push(Message::debug(format!(
                "Window {window}: {} rows in {} pages",
                walk.rows(),
                walk.pages
            )));
            stats.add_window(walk.pages, walk.rows());
            aggregator.push_window(walk.batches);
        }

        let aggregated = aggregator.finish();
        stats.duplicates_removed = aggregated.duplicates_removed;

        let policy = EmptyResultPolicy::new(request.if_empty);
        let (mut table, notice) = policy.apply(aggregated.table, source.as_str())?;
        messages.extend(notice);

        if table.is_empty() {
            debug!("Empty result for '{}', skipping metadata columns", source);
        } else {
            self.metadata.inject(&mut table, &self.settings.source_name);
        }

        stats.rows = table.len();
        stats.set_duration(start.elapsed().as_millis() as u64);

        info!(
            "Extracted {} rows from '{}' ({} pages, {} duplicates removed)",
            stats.rows, source, stats.pages_fetched, stats.duplicates_removed
        );
        messages.push(Message::info(format!(
            "Completed extraction for {source}: {} rows",
            stats.rows
        )));

        Ok(Extraction {
            table,
            stats,
            messages,
        })
    }

    /// Sub-windows for a request. The reference endpoint ignores dates and
    /// is fetched once.
    fn windows(&self, request: &ExtractRequest) -> Result<Vec<DateWindow>> {
        if !request.source.is_date_filtered() {
            return Ok(vec![request.window]);
        }
        let span = request
            .max_span_days
            .unwrap_or(self.settings.max_span_days);
        partition(request.window.from, request.window.to, span)
    }
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("credentials", &self.credentials)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
