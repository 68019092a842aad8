//! Pagination: the time cursor and the bounded page size.
//!
//! Both are parsed from raw client strings and kept apart from the feed
//! query itself so their rules can be checked in isolation.

use chrono::{DateTime, TimeDelta, Utc};

use crate::{Error, Result};

/// Page size used when the client sends none, or sends garbage.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Upper clamp applied to any requested page size.
pub const MAX_PAGE_SIZE: usize = 100;

// ─── Page limit ──────────────────────────────────────────────────────────────

/// A page size in `1..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimit(usize);

impl PageLimit {
  /// Interpret a raw `limit` parameter.
  ///
  /// Absent, non-numeric, zero and negative values all fall back to
  /// [`DEFAULT_PAGE_SIZE`]; anything above `max` is clamped to `max`.
  pub fn parse(raw: Option<&str>, max: usize) -> Self {
    let max = max.max(1);
    let requested = raw
      .map(str::trim)
      .and_then(|s| s.parse::<i64>().ok())
      .filter(|n| *n > 0)
      .map(|n| usize::try_from(n).unwrap_or(usize::MAX));

    Self(requested.unwrap_or(DEFAULT_PAGE_SIZE).min(max))
  }

  pub fn get(self) -> usize { self.0 }
}

impl Default for PageLimit {
  fn default() -> Self { Self(DEFAULT_PAGE_SIZE) }
}

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// "Only posts older than X." Holds the inclusive upper bound on
/// `created_at`, which is one millisecond before the client's timestamp so a
/// repeated "load older" never returns the boundary post again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
  boundary: DateTime<Utc>,
}

impl Cursor {
  /// Build a cursor from the `created_at` of the oldest post already seen.
  pub fn older_than(timestamp: DateTime<Utc>) -> Self {
    Self { boundary: timestamp - TimeDelta::milliseconds(1) }
  }

  /// Parse a client-supplied RFC 3339 timestamp. An absent or blank string
  /// means "first page" and yields `None`.
  pub fn parse(raw: Option<&str>) -> Result<Option<Self>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
      return Ok(None);
    };
    let timestamp = DateTime::parse_from_rfc3339(raw)
      .map_err(|e| Error::invalid(format!("invalid cursor {raw:?}: {e}")))?
      .with_timezone(&Utc);
    Ok(Some(Self::older_than(timestamp)))
  }

  /// Inclusive upper bound on eligible creation times.
  pub fn boundary(&self) -> DateTime<Utc> { self.boundary }

  pub fn admits(&self, created_at: DateTime<Utc>) -> bool {
    created_at <= self.boundary
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn limit_defaults_when_absent_or_garbage() {
    assert_eq!(PageLimit::parse(None, MAX_PAGE_SIZE).get(), 5);
    assert_eq!(PageLimit::parse(Some(""), MAX_PAGE_SIZE).get(), 5);
    assert_eq!(PageLimit::parse(Some("ten"), MAX_PAGE_SIZE).get(), 5);
    assert_eq!(PageLimit::parse(Some("0"), MAX_PAGE_SIZE).get(), 5);
    assert_eq!(PageLimit::parse(Some("-3"), MAX_PAGE_SIZE).get(), 5);
  }

  #[test]
  fn limit_accepts_and_clamps() {
    assert_eq!(PageLimit::parse(Some("12"), MAX_PAGE_SIZE).get(), 12);
    assert_eq!(PageLimit::parse(Some(" 7 "), MAX_PAGE_SIZE).get(), 7);
    assert_eq!(PageLimit::parse(Some("100000"), MAX_PAGE_SIZE).get(), 100);
    assert_eq!(PageLimit::parse(Some("9"), 3).get(), 3);
    assert_eq!(PageLimit::parse(None, 3).get(), 3);
  }

  #[test]
  fn blank_cursor_is_first_page() {
    assert_eq!(Cursor::parse(None).unwrap(), None);
    assert_eq!(Cursor::parse(Some("  ")).unwrap(), None);
  }

  #[test]
  fn cursor_subtracts_one_millisecond() {
    let cursor = Cursor::parse(Some("2024-03-01T12:00:00.500Z"))
      .unwrap()
      .unwrap();
    let expected = DateTime::parse_from_rfc3339("2024-03-01T12:00:00.499Z")
      .unwrap()
      .with_timezone(&Utc);
    assert_eq!(cursor.boundary(), expected);
  }

  #[test]
  fn cursor_excludes_its_own_timestamp() {
    let ts = Utc::now();
    let cursor = Cursor::older_than(ts);
    assert!(!cursor.admits(ts));
    assert!(cursor.admits(ts - TimeDelta::milliseconds(1)));
    assert!(cursor.admits(ts - TimeDelta::seconds(10)));
  }

  #[test]
  fn malformed_cursor_is_invalid_argument() {
    let err = Cursor::parse(Some("yesterday")).unwrap_err();
    assert_eq!(err.kind(), crate::ErrorKind::InvalidArgument);
  }
}
