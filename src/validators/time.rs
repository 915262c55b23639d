// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Time-window validation for SIWE messages.
//!
//! The current instant is always passed in explicitly so callers (and
//! tests) control the clock. Comparisons are exact at millisecond
//! precision; there is no grace window.

use chrono::{DateTime, Utc};

use crate::params::SiweMessageParams;

/// A message is outside its validity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TimeError {
    #[error("The message has expired (now >= expirationTime).")]
    Expired,

    #[error("The message is not valid yet (notBefore > now).")]
    NotYetValid,
}

/// Validate `expiration_time` and `not_before` against `now`.
///
/// A message expires the instant `now` reaches `expiration_time`, and is
/// not yet valid while `now` is before `not_before`.
pub fn validate_at(params: &SiweMessageParams, now: DateTime<Utc>) -> Result<(), TimeError> {
    if let Some(expiration_time) = params.expiration_time() {
        if now >= expiration_time {
            return Err(TimeError::Expired);
        }
    }

    if let Some(not_before) = params.not_before() {
        if now < not_before {
            return Err(TimeError::NotYetValid);
        }
    }

    Ok(())
}

/// Validate against the wall clock.
pub fn validate(params: &SiweMessageParams) -> Result<(), TimeError> {
    validate_at(params, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SiweMessageParamsBuilder;
    use crate::time_format;

    fn at(iso: &str) -> DateTime<Utc> {
        time_format::from_iso(iso).unwrap()
    }

    fn params_with_window(
        expiration_time: Option<&str>,
        not_before: Option<&str>,
    ) -> SiweMessageParams {
        let mut builder = SiweMessageParamsBuilder::new()
            .address("0xA0Cf798816D4b9b9866b5330EEa46a18382f251e")
            .chain_id(1)
            .domain("example.com")
            .uri("https://example.com/path")
            .nonce("foobarbaz")
            .issued_at(at("2023-02-01T00:00:00.000Z"));

        if let Some(iso) = expiration_time {
            builder = builder.expiration_time(at(iso));
        }
        if let Some(iso) = not_before {
            builder = builder.not_before(at(iso));
        }

        builder.build().unwrap()
    }

    #[test]
    fn no_window_always_valid() {
        let params = params_with_window(None, None);
        assert_eq!(validate_at(&params, at("2023-02-01T00:00:00.000Z")), Ok(()));
        assert_eq!(validate_at(&params, at("2999-01-01T00:00:00.000Z")), Ok(()));
    }

    #[test]
    fn expires_at_the_exact_instant() {
        let params = params_with_window(Some("2023-02-02T00:00:00.000Z"), None);

        assert_eq!(validate_at(&params, at("2023-02-01T23:59:59.999Z")), Ok(()));
        assert_eq!(
            validate_at(&params, at("2023-02-02T00:00:00.000Z")),
            Err(TimeError::Expired)
        );
        assert_eq!(
            validate_at(&params, at("2023-02-03T00:00:00.000Z")),
            Err(TimeError::Expired)
        );
    }

    #[test]
    fn not_before_gates_early_use() {
        let params = params_with_window(None, Some("2023-02-02T00:00:00.000Z"));

        assert_eq!(
            validate_at(&params, at("2023-02-01T23:59:59.999Z")),
            Err(TimeError::NotYetValid)
        );
        // The boundary instant itself is valid.
        assert_eq!(validate_at(&params, at("2023-02-02T00:00:00.000Z")), Ok(()));
        assert_eq!(validate_at(&params, at("2023-02-05T00:00:00.000Z")), Ok(()));
    }

    #[test]
    fn expiration_is_checked_before_not_before() {
        let params = params_with_window(
            Some("2023-02-02T00:00:00.000Z"),
            Some("2023-02-10T00:00:00.000Z"),
        );

        assert_eq!(
            validate_at(&params, at("2023-03-01T00:00:00.000Z")),
            Err(TimeError::Expired)
        );
    }
}
