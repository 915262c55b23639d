// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Strict ISO-8601 timestamp formatting for SIWE messages.
//!
//! EIP-4361 timestamps are rendered with millisecond precision and a
//! literal trailing `Z` (`2023-02-01T00:00:00.000Z`). Parsing accepts
//! exactly that shape and nothing else: numeric offsets, a missing or
//! over-long fractional part, or a lowercase `z` are all rejected.

use chrono::{DateTime, NaiveDateTime, Utc};

/// The single accepted timestamp pattern.
const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Timestamp string does not match the SIWE ISO-8601 pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("time must match the ISO-8601 pattern YYYY-MM-DDTHH:mm:ss.mmmZ")]
pub struct TimeFormatError;

/// Render an instant as a SIWE timestamp string.
pub fn to_iso(datetime: &DateTime<Utc>) -> String {
    datetime.format(ISO_FORMAT).to_string()
}

/// Parse a SIWE timestamp string.
///
/// The parse is strict: the input must re-render byte-identically, so
/// variants chrono would otherwise tolerate (single-digit months, a
/// four-digit fraction) fail here.
pub fn from_iso(iso: &str) -> Result<DateTime<Utc>, TimeFormatError> {
    let naive =
        NaiveDateTime::parse_from_str(iso, ISO_FORMAT).map_err(|_| TimeFormatError)?;
    let datetime = naive.and_utc();

    if to_iso(&datetime) != iso {
        return Err(TimeFormatError);
    }

    Ok(datetime)
}

/// Drop sub-millisecond precision from an instant.
///
/// Defaulted `issued_at` values pass through here so that a created
/// message parses back to equal parameters.
pub fn truncate_to_millis(datetime: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(datetime.timestamp_millis())
        .unwrap_or(datetime)
}
