//! Pagination walker
//!
//! Walks every page of one date window: `Init -> Paging -> Done`. Any error
//! ends the walk immediately and is returned to the caller; there is no
//! page-level retry here, the transport owns retries.

use super::types::{PaginationStyle, WalkState, WindowWalk};
use crate::decode::{decode_frame, Batch};
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::partition::DateWindow;
use crate::query::{PageToken, QueryBuilder};
use crate::types::{JsonValue, Region, Source};
use tracing::debug;

/// Fetches and decodes all pages of one source for a date window
pub struct PaginationWalker<'a> {
    transport: &'a dyn Transport,
    builder: QueryBuilder<'a>,
    source: Source,
    items_per_page: u32,
    region: &'a Region,
}

impl<'a> PaginationWalker<'a> {
    /// Create a walker
    pub fn new(
        transport: &'a dyn Transport,
        builder: QueryBuilder<'a>,
        source: Source,
        items_per_page: u32,
        region: &'a Region,
    ) -> Self {
        Self {
            transport,
            builder,
            source,
            items_per_page,
            region,
        }
    }

    /// Walk all pages of `window`.
    ///
    /// State is local to this call, so the pagination style is re-derived
    /// from the first response every time.
    pub async fn walk(&self, window: &DateWindow) -> Result<WindowWalk> {
        let mut walk = WindowWalk::default();
        let mut state = WalkState::Init;

        loop {
            state = match state {
                WalkState::Init => {
                    let payload = self.fetch(window, &PageToken::None).await?;
                    walk.pages += 1;

                    if !(payload.is_object() || payload.is_array()) {
                        return Err(Error::decode(format!(
                            "'{}' returned a non-tabular payload: {payload}",
                            self.source
                        )));
                    }

                    let style = PaginationStyle::classify(&payload);
                    debug!(
                        "{} {}: first response classified as {:?}",
                        self.source, window, style
                    );
                    walk.style = Some(style.clone());

                    if style.is_paginated() {
                        let batch = self.decode_page(&payload, 1)?;
                        let next = self.advance(&style, &payload, &batch, &PageToken::None);
                        walk.batches.push(batch);
                        next
                    } else {
                        walk.batches.push(self.prepare(decode_frame(&payload)?));
                        WalkState::Done
                    }
                }
                WalkState::Paging { style, token } => {
                    let payload = self.fetch(window, &token).await?;
                    walk.pages += 1;

                    let batch = self.decode_page(&payload, walk.pages)?;
                    let next = self.advance(&style, &payload, &batch, &token);
                    walk.batches.push(batch);
                    next
                }
                WalkState::Done => break,
            };
        }

        debug!(
            "{} {}: {} rows in {} pages",
            self.source,
            window,
            walk.rows(),
            walk.pages
        );

        Ok(walk)
    }

    /// Send one request, wrapping transport failures with the request
    async fn fetch(&self, window: &DateWindow, token: &PageToken) -> Result<JsonValue> {
        let request =
            self.builder
                .build(self.source, window, token, self.items_per_page, self.region)?;
        debug!("Fetching {}", request);

        self.transport
            .send(&request)
            .await
            .map_err(|e| Error::upstream(&request, e))
    }

    /// Decode the `data` member of a paginated response
    fn decode_page(&self, payload: &JsonValue, page: usize) -> Result<Batch> {
        let data = payload.get("data").ok_or_else(|| {
            Error::decode(format!(
                "page {page} of paginated '{}' response has no 'data' key",
                self.source
            ))
        })?;
        Ok(self.prepare(decode_frame(data)?))
    }

    /// Apply endpoint-specific corrections to a decoded batch
    fn prepare(&self, batch: Batch) -> Batch {
        if self.source.is_transposed() {
            batch.transpose()
        } else {
            batch
        }
    }

    /// Decide the next state after a page. A short page is the only
    /// termination signal for a well-formed walk.
    fn advance(
        &self,
        style: &PaginationStyle,
        payload: &JsonValue,
        batch: &Batch,
        current: &PageToken,
    ) -> WalkState {
        if batch.len() < self.items_per_page as usize {
            return WalkState::Done;
        }

        match style.next_token(payload, current) {
            Some(token) if token == *current => {
                debug!(
                    "{}: cursor did not advance past {:?}, stopping walk",
                    self.source, token
                );
                WalkState::Done
            }
            Some(token) => WalkState::Paging {
                style: style.clone(),
                token,
            },
            None => {
                debug!(
                    "{}: full page without a usable cursor, stopping walk",
                    self.source
                );
                WalkState::Done
            }
        }
    }
}
