//! Interval partitioner

use super::types::DateWindow;
use crate::error::{Error, Result};
use chrono::{Duration, NaiveDate};

/// Split `[from, to]` into windows spanning at most `max_span_days` days.
///
/// Each window starts where the previous one ended and the last window is
/// clamped to `to`. A degenerate `from == to` range yields exactly one window,
/// so callers always have something to query.
pub fn partition(from: NaiveDate, to: NaiveDate, max_span_days: u32) -> Result<Vec<DateWindow>> {
    let overall = DateWindow::new(from, to)?;

    if max_span_days == 0 {
        return Err(Error::validation("max_span_days must be at least 1"));
    }

    if overall.from == overall.to {
        return Ok(vec![overall]);
    }

    let step = Duration::days(i64::from(max_span_days));
    let mut windows = Vec::new();
    let mut current = overall.from;

    while current < overall.to {
        let next = current
            .checked_add_signed(step)
            .map_or(overall.to, |next| next.min(overall.to));
        windows.push(DateWindow {
            from: current,
            to: next,
        });
        current = next;
    }

    Ok(windows)
}
