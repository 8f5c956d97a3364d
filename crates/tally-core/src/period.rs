//! # Period Engine
//!
//! Pure date-range resolution for filtering and reporting. No I/O.
//!
//! ## How Ranges Are Resolved
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Period Resolution                                  │
//! │                                                                         │
//! │  period token?                                                          │
//! │  ├── "today" → [local midnight, 23:59:59.999] of the current day       │
//! │  ├── "week"  → Sunday 00:00:00.000 → Saturday 23:59:59.999             │
//! │  └── "month" → 1st 00:00:00.000 → last day 23:59:59.999                │
//! │                                                                         │
//! │  otherwise: explicit (start, end) ISO strings                           │
//! │  ├── valid   → that bound                                               │
//! │  └── invalid/missing → open bound (no filter)                           │
//! │                                                                         │
//! │  daily-sales special case: requires a CLOSED interval; falls back       │
//! │  to the current week when no valid bound is supplied                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Bounds are computed on `NaiveDate` (fully testable with a pinned "today")
//! and anchored at the device/server local day, then converted to UTC for
//! storage filters. Daily-sales grouping uses the same local day boundary.

use chrono::{
    DateTime, Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Utc,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// Period Token
// =============================================================================

/// Named shorthand for a concrete closed date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Today,
    Week,
    Month,
}

impl Period {
    /// Parses a period token. Unknown tokens resolve to `None` so callers
    /// fall through to explicit-date handling.
    pub fn parse(token: &str) -> Option<Period> {
        match token.trim().to_lowercase().as_str() {
            "today" => Some(Period::Today),
            "week" => Some(Period::Week),
            "month" => Some(Period::Month),
            _ => None,
        }
    }

    /// Resolves this period's closed bounds relative to `today`.
    ///
    /// Pure on naive dates: callers pin `today` in tests and pass the
    /// current local date in production.
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        match self {
            Period::Today => (day_start(today), day_end(today)),
            Period::Week => {
                // Week runs Sunday through the following Saturday.
                let sunday = today - Duration::days(today.weekday().num_days_from_sunday() as i64);
                let saturday = sunday + Duration::days(6);
                (day_start(sunday), day_end(saturday))
            }
            Period::Month => {
                let first = today.with_day(1).unwrap_or(today);
                let last = first
                    .checked_add_months(Months::new(1))
                    .and_then(|next_first| next_first.pred_opt())
                    .unwrap_or(today);
                (day_start(first), day_end(last))
            }
        }
    }
}

// =============================================================================
// Date Range
// =============================================================================

/// A possibly open-ended interval used by `find_many`-style filters.
///
/// `None` on either side means "no bound".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// A range with no bounds (matches everything).
    pub fn open() -> Self {
        DateRange::default()
    }

    /// True when both bounds are present.
    pub fn is_closed(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
}

/// Resolves a range from an optional period token or explicit ISO date
/// strings, relative to the current local date.
///
/// A recognized period always wins over explicit dates. Explicit strings
/// that fail to parse resolve to "no bound" rather than an error, so a
/// stray query parameter degrades to an unfiltered list instead of a 400.
pub fn resolve_range(
    period: Option<Period>,
    start: Option<&str>,
    end: Option<&str>,
) -> DateRange {
    resolve_range_at(period, start, end, Local::now().date_naive())
}

/// [`resolve_range`] with a pinned "today" for deterministic tests.
pub fn resolve_range_at(
    period: Option<Period>,
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
) -> DateRange {
    if let Some(period) = period {
        let (start, end) = period.bounds(today);
        return DateRange {
            start: Some(local_to_utc(start)),
            end: Some(local_to_utc(end)),
        };
    }

    DateRange {
        start: start.and_then(|s| parse_bound(s, Bound::Start)),
        end: end.and_then(|s| parse_bound(s, Bound::End)),
    }
}

/// Resolves the closed interval the daily-sales report requires.
///
/// Falls back to the current week when the inputs do not produce both
/// bounds, so the report always has a well-defined window.
pub fn resolve_daily_sales_range(
    period: Option<Period>,
    start: Option<&str>,
    end: Option<&str>,
) -> (DateTime<Utc>, DateTime<Utc>) {
    resolve_daily_sales_range_at(period, start, end, Local::now().date_naive())
}

/// [`resolve_daily_sales_range`] with a pinned "today".
pub fn resolve_daily_sales_range_at(
    period: Option<Period>,
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let range = resolve_range_at(period, start, end, today);
    match (range.start, range.end) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            let (start, end) = Period::Week.bounds(today);
            (local_to_utc(start), local_to_utc(end))
        }
    }
}

/// The local calendar day a stored (UTC) timestamp falls on.
///
/// This is the grouping key for the daily sales series: day boundaries are
/// local, not UTC-normalized.
pub fn local_day(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}

// =============================================================================
// Internals
// =============================================================================

enum Bound {
    Start,
    End,
}

/// Parses one explicit bound. Accepts a full RFC 3339 instant or a bare
/// ISO date; a bare date expands to the local start or end of that day.
fn parse_bound(value: &str, which: Bound) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    let at = match which {
        Bound::Start => day_start(date),
        Bound::End => day_end(date),
    };
    Some(local_to_utc(at))
}

fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn day_end(date: NaiveDate) -> NaiveDateTime {
    // 23:59:59.999 - the interval is closed at both ends.
    date.and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN))
}

/// Anchors a local wall-clock time in UTC. Around DST transitions the
/// earliest valid interpretation wins; a nonexistent local time falls back
/// to reading the naive value as UTC.
fn local_to_utc(at: NaiveDateTime) -> DateTime<Utc> {
    Local
        .from_local_datetime(&at)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&at))
}

// =============================================================================
// Unit Tests
// =============================================================================
