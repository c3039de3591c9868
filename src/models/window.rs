//! Inclusive UTC date windows for replay searches.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive `[from, to]` window, both ends in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateWindow {
    /// Build a window covering whole days: start of `from` to end of `to`.
    ///
    /// Returns `None` if `from` is after `to`.
    pub fn from_days(from: NaiveDate, to: NaiveDate) -> Option<Self> {
        if from > to {
            return None;
        }

        let start = from.and_hms_opt(0, 0, 0)?.and_utc();
        let end = to
            .and_hms_micro_opt(23, 59, 59, 999_999)
            .map(|dt| dt.and_utc())?;

        Some(Self {
            from: start,
            to: end,
        })
    }

    pub fn from_date(&self) -> NaiveDate {
        self.from.date_naive()
    }

    pub fn to_date(&self) -> NaiveDate {
        self.to.date_naive()
    }
}

/// Format a timestamp the way the search endpoint expects it.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}
