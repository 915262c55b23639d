// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Crate-wide error type.
//!
//! Each module defines its own precise error; [`SiweError`] is the
//! umbrella that fallible entry points return so callers can match on
//! the failure class without juggling every module error themselves.

use crate::ethereum::signature::SignatureError;
use crate::message::{ParseError, ValidateError};
use crate::time_format::TimeFormatError;
use crate::validators::field::FieldError;
use crate::validators::time::TimeError;

#[derive(Debug, thiserror::Error)]
pub enum SiweError {
    /// A message field failed its validation rules.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// The message is outside its validity window.
    #[error(transparent)]
    Time(#[from] TimeError),

    /// Message text does not parse as a SIWE message.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The signature is malformed or does not match the claimed address.
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// A timestamp string is not in the canonical ISO-8601 form.
    #[error(transparent)]
    TimeFormat(#[from] TimeFormatError),

    /// A field did not carry the value the relying party expected.
    #[error(transparent)]
    Validate(#[from] ValidateError),
}
