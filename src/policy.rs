//! Empty-result policy
//!
//! Decides what a zero-row final table means for the caller: an error, a
//! silent empty result, or an empty result with a warning attached.

use crate::engine::Message;
use crate::error::{Error, Result};
use crate::table::Table;
use crate::types::IfEmpty;
use tracing::warn;

/// Applies an [`IfEmpty`] mode to a final table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptyResultPolicy {
    mode: IfEmpty,
}

impl EmptyResultPolicy {
    /// Create a policy for the given mode
    pub fn new(mode: IfEmpty) -> Self {
        Self { mode }
    }

    /// The configured mode
    pub fn mode(&self) -> IfEmpty {
        self.mode
    }

    /// Apply the policy.
    ///
    /// Non-empty tables pass through untouched in every mode. For an empty
    /// table, `Fail` returns `EmptyResult`, `Skip` returns the table and
    /// `Warn` returns the table with a warning message.
    pub fn apply(&self, table: Table, source_name: &str) -> Result<(Table, Option<Message>)> {
        if !table.is_empty() {
            return Ok((table, None));
        }

        match self.mode {
            IfEmpty::Fail => Err(Error::empty_result(source_name)),
            IfEmpty::Skip => Ok((table, None)),
            IfEmpty::Warn => {
                let text = format!("The extraction of '{source_name}' returned no data");
                warn!("{}", text);
                Ok((table, Some(Message::warn(text))))
            }
        }
    }
}
