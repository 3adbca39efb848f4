//! Pagination module
//!
//! Supports: Page Number, Cursor (opaque token or next-page URL), None
//!
//! # Overview
//!
//! The API has changed its pagination scheme over time, so the style is never
//! configured. The walker inspects the first response of every window,
//! classifies it once into a `PaginationStyle`, and threads that style through
//! the rest of the walk. A page with fewer rows than requested ends the walk.

mod types;
mod walker;

pub use types::{PaginationStyle, WalkState, WindowWalk, CURSOR_KEYS};
pub use walker::PaginationWalker;

#[cfg(test)]
mod tests;
