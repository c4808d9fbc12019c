use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch.
///
/// Totally ordered; all interval and bracket logic compares these rather
/// than calendar values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.timestamp_millis())
    }

    /// `None` when the value is outside chrono's representable range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }

    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Position of `self` within `[start, end]` as a fraction.
    ///
    /// Differences are taken in `i128` so the full `i64` range is usable.
    pub(crate) fn fraction_between(&self, start: Timestamp, end: Timestamp) -> f64 {
        let offset = i128::from(self.0) - i128::from(start.0);
        let span = i128::from(end.0) - i128::from(start.0);
        offset as f64 / span as f64
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self::from_datetime(at)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(at) => write!(f, "{}", at.to_rfc3339()),
            None => write!(f, "{}ms", self.0),
        }
    }
}

/// A period starting at `start`; `end == None` while the interval is open.
///
/// Intervals of a net are half-open `[start, end)` and never overlap.
/// Membership queries accept both bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: Timestamp,
    pub end: Option<Timestamp>,
}

impl TimeInterval {
    pub fn open(start: Timestamp) -> Self {
        Self { start, end: None }
    }

    pub fn closed(start: Timestamp, end: Timestamp) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    pub fn contains(&self, at: Timestamp) -> bool {
        at >= self.start && self.end.is_none_or(|end| at <= end)
    }

    pub fn close(&mut self, at: Timestamp) {
        self.end = Some(at);
    }

    /// Shared extent under half-open semantics; touching endpoints do not
    /// overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        let before = |a: &Self, b: &Self| a.end.is_some_and(|end| end <= b.start);
        !before(self, other) && !before(other, self)
    }
}
