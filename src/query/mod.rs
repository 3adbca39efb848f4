//! Query building module
//!
//! Turns an endpoint, a date window and a page token into a fully qualified
//! request descriptor. Date-filtered endpoints get `from`, `to`, `limit` and
//! `region` parameters plus the page token; the survey dictionary endpoint
//! always gets the same fixed query.

mod builder;
mod types;

pub use builder::QueryBuilder;
pub use types::{PageToken, RequestDescriptor};
