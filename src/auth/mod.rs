//! Authentication module
//!
//! The datalake API authenticates every request with a static bearer token.
//! `Credentials` pairs that token with the API base URL and is validated once,
//! when the extractor is constructed, so a bad configuration fails before any
//! request is attempted.

mod types;

pub use types::{Credentials, TOKEN_ENV, URL_ENV};

#[cfg(test)]
mod tests;
