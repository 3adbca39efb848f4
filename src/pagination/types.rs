//! Pagination types
//!
//! Defines the pagination style classification and the walker state machine.

use crate::decode::Batch;
use crate::query::PageToken;
use crate::types::JsonValue;

/// Sibling keys of `data` that mark a cursor-paginated response, in lookup order
pub const CURSOR_KEYS: [&str; 4] = ["next_cursor", "cursor", "next", "next_page_url"];

/// Pagination style of an endpoint, decided from the first response of a walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationStyle {
    /// Whole payload is the only batch
    None,
    /// `page=N`, starting at 1
    PageNumber,
    /// Cursor read from the given response key
    Cursor {
        /// Response key holding the next cursor
        key: String,
    },
}

impl PaginationStyle {
    /// Classify a first response.
    ///
    /// A mapping with a `data` key is paginated: cursor-style when one of
    /// [`CURSOR_KEYS`] sits next to `data`, page-number otherwise. Anything
    /// else (a bare list, a mapping without `data`) is unpaginated.
    pub fn classify(payload: &JsonValue) -> Self {
        let Some(obj) = payload.as_object() else {
            return Self::None;
        };

        if !obj.contains_key("data") {
            return Self::None;
        }

        CURSOR_KEYS
            .iter()
            .find(|key| obj.contains_key(**key))
            .map_or(Self::PageNumber, |key| Self::Cursor {
                key: (*key).to_string(),
            })
    }

    /// Check if this style pages at all
    pub fn is_paginated(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Token for the page after `current`, read from `payload` when needed.
    ///
    /// Returns `None` when the next page cannot be addressed: unpaginated
    /// style, or a cursor response without a usable cursor value.
    pub fn next_token(&self, payload: &JsonValue, current: &PageToken) -> Option<PageToken> {
        match self {
            Self::None => None,
            Self::PageNumber => {
                let page = match current {
                    PageToken::PageNumber(page) => *page,
                    _ => 1,
                };
                Some(PageToken::PageNumber(page + 1))
            }
            Self::Cursor { key } => match payload.get(key) {
                Some(JsonValue::String(cursor)) if !cursor.is_empty() => {
                    Some(PageToken::Cursor(cursor.clone()))
                }
                Some(JsonValue::Number(n)) => Some(PageToken::Cursor(n.to_string())),
                _ => None,
            },
        }
    }
}

/// Walker state for one date window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkState {
    /// First request not sent yet
    Init,
    /// Paginated walk in progress
    Paging {
        /// Style classified from the first response
        style: PaginationStyle,
        /// Token of the next request
        token: PageToken,
    },
    /// No more pages
    Done,
}

/// Result of walking one date window
#[derive(Debug, Clone, Default)]
pub struct WindowWalk {
    /// Batches in encounter order
    pub batches: Vec<Batch>,
    /// Number of requests sent
    pub pages: usize,
    /// Style the first response was classified as
    pub style: Option<PaginationStyle>,
}

impl WindowWalk {
    /// Total rows across batches
    pub fn rows(&self) -> usize {
        self.batches.iter().map(Batch::len).sum()
    }
}
