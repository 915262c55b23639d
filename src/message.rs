// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Canonical SIWE message serialization, parsing, and verification.
//!
//! The serialized layout is a wire-format contract shared with every
//! spec-compliant wallet: the same parameters must always produce the
//! same bytes, since those bytes are what gets hashed and signed.
//! Parsing is the exact inverse, implemented as a sequential line walk
//! that fails at the first structurally wrong line; the `Resources:`
//! block closes the message and is consumed by the same walk, after the
//! statement and metadata lines, so free text that happens to start with
//! `Resources:` cannot be mistaken for it.

use chrono::{DateTime, Utc};

use crate::error::SiweError;
use crate::ethereum::signature::{self, SignatureError};
use crate::params::{SiweMessageParams, SiweMessageParamsBuilder};
use crate::time_format::{self, TimeFormatError};
use crate::validators::field::FieldError;
use crate::validators::time;

/// Message text does not match the canonical EIP-4361 layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("message does not match the EIP-4361 message format")]
    Structure,

    #[error(transparent)]
    Time(#[from] TimeFormatError),

    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Serialize parameters into the canonical SIWE text.
pub fn create(params: &SiweMessageParams) -> String {
    let origin = match params.scheme() {
        Some(scheme) => format!("{scheme}://{}", params.domain()),
        None => params.domain().to_string(),
    };

    let mut message = format!(
        "{origin} wants you to sign in with your Ethereum account:\n{}\n\n",
        params.address()
    );

    if let Some(statement) = params.statement() {
        message.push_str(statement);
        message.push('\n');
    }

    message.push_str(&format!("\nURI: {}", params.uri()));
    message.push_str(&format!("\nVersion: {}", params.version()));
    message.push_str(&format!("\nChain ID: {}", params.chain_id()));
    message.push_str(&format!("\nNonce: {}", params.nonce()));
    message.push_str(&format!(
        "\nIssued At: {}",
        time_format::to_iso(&params.issued_at())
    ));

    if let Some(expiration_time) = params.expiration_time() {
        message.push_str(&format!(
            "\nExpiration Time: {}",
            time_format::to_iso(&expiration_time)
        ));
    }

    if let Some(not_before) = params.not_before() {
        message.push_str(&format!("\nNot Before: {}", time_format::to_iso(&not_before)));
    }

    if let Some(request_id) = params.request_id() {
        message.push_str(&format!("\nRequest ID: {request_id}"));
    }

    if let Some(resources) = params.resources() {
        message.push_str("\nResources:");
        for resource in resources {
            message.push_str(&format!("\n- {resource}"));
        }
    }

    message
}

/// Parse canonical SIWE text back into parameters.
///
/// Structural mismatches fail with [`ParseError::Structure`]; extracted
/// fields are then re-validated through normal construction, so a
/// well-shaped message with invalid contents also fails rather than
/// yielding a partial result.
pub fn parse(message: &str) -> Result<SiweMessageParams, ParseError> {
    let mut lines = message.split('\n');

    let header = lines.next().ok_or(ParseError::Structure)?;
    let origin = header
        .strip_suffix(" wants you to sign in with your Ethereum account:")
        .ok_or(ParseError::Structure)?;

    let (scheme, domain) = match origin.split_once("://") {
        Some((scheme, domain)) if !scheme.is_empty() => (Some(scheme), domain),
        Some(_) => return Err(ParseError::Structure),
        None => (None, origin),
    };

    let address = lines.next().ok_or(ParseError::Structure)?;
    if !address_shaped(address) {
        return Err(ParseError::Structure);
    }

    if lines.next() != Some("") {
        return Err(ParseError::Structure);
    }

    // Either a blank line straight into the metadata block, or a single
    // statement line followed by the blank line.
    let statement = match lines.next() {
        Some("") => None,
        Some(statement) => {
            if lines.next() != Some("") {
                return Err(ParseError::Structure);
            }
            Some(statement)
        }
        None => return Err(ParseError::Structure),
    };

    let uri = expect_field(lines.next(), "URI: ")?;
    let version = expect_field(lines.next(), "Version: ")?;
    let chain_id = expect_field(lines.next(), "Chain ID: ")?
        .parse::<u64>()
        .map_err(|_| ParseError::Structure)?;
    let nonce = expect_field(lines.next(), "Nonce: ")?;
    let issued_at = time_format::from_iso(expect_field(lines.next(), "Issued At: ")?)?;

    let mut expiration_time = None;
    let mut not_before = None;
    let mut request_id = None;
    let mut cursor = lines.next();

    if let Some(value) = cursor.and_then(|line| line.strip_prefix("Expiration Time: ")) {
        expiration_time = Some(time_format::from_iso(value)?);
        cursor = lines.next();
    }
    if let Some(value) = cursor.and_then(|line| line.strip_prefix("Not Before: ")) {
        not_before = Some(time_format::from_iso(value)?);
        cursor = lines.next();
    }
    if let Some(value) = cursor.and_then(|line| line.strip_prefix("Request ID: ")) {
        request_id = Some(value);
        cursor = lines.next();
    }

    // The resource block runs to the end of the message: a header line
    // and then one `- ` item per line, at least one.
    let resources = match cursor {
        Some("Resources:") => {
            let mut items = Vec::new();
            for line in lines {
                let resource = line.strip_prefix("- ").ok_or(ParseError::Structure)?;
                items.push(resource.to_string());
            }
            if items.is_empty() {
                return Err(ParseError::Structure);
            }
            Some(items)
        }
        Some(_) => return Err(ParseError::Structure),
        None => None,
    };

    let mut builder = SiweMessageParamsBuilder::new()
        .address(address)
        .chain_id(chain_id)
        .domain(domain)
        .uri(uri)
        .issued_at(issued_at)
        .nonce(nonce)
        .version(version);

    if let Some(scheme) = scheme {
        builder = builder.scheme(scheme);
    }
    if let Some(statement) = statement {
        builder = builder.statement(statement);
    }
    if let Some(expiration_time) = expiration_time {
        builder = builder.expiration_time(expiration_time);
    }
    if let Some(not_before) = not_before {
        builder = builder.not_before(not_before);
    }
    if let Some(request_id) = request_id {
        builder = builder.request_id(request_id);
    }
    if let Some(resources) = resources {
        builder = builder.resources(resources);
    }

    Ok(builder.build()?)
}

/// Verify a signature for a parameter set against the wall clock.
///
/// Re-derives the canonical text, so the signature must cover exactly
/// these parameters. Every failure collapses to `false`.
pub fn verify(params: &SiweMessageParams, signature: &str) -> bool {
    verify_at(params, signature, Utc::now())
}

/// [`verify`] with an explicit current instant.
pub fn verify_at(params: &SiweMessageParams, signature: &str, now: DateTime<Utc>) -> bool {
    match verify_or_fail_at(params, &create(params), signature, now) {
        Ok(()) => true,
        Err(error) => {
            tracing::debug!(%error, "SIWE verification failed");
            false
        }
    }
}

/// Verify a signature for raw SIWE text.
///
/// Parses the text first, then verifies the signature over the supplied
/// bytes. Every failure, including a parse failure, collapses to `false`.
pub fn verify_message(message: &str, signature: &str) -> bool {
    verify_message_at(message, signature, Utc::now())
}

/// [`verify_message`] with an explicit current instant.
pub fn verify_message_at(message: &str, signature: &str, now: DateTime<Utc>) -> bool {
    let params = match parse(message) {
        Ok(params) => params,
        Err(error) => {
            tracing::debug!(%error, "SIWE message did not parse");
            return false;
        }
    };

    match verify_or_fail_at(&params, message, signature, now) {
        Ok(()) => true,
        Err(error) => {
            tracing::debug!(%error, "SIWE verification failed");
            false
        }
    }
}

/// Verify a signature, propagating the concrete failure.
///
/// Runs time validation first, then signature recovery; callers that need
/// to distinguish "expired" from "bad signature" use this instead of the
/// boolean entry points.
pub fn verify_or_fail(
    params: &SiweMessageParams,
    message: &str,
    signature: &str,
) -> Result<(), SiweError> {
    verify_or_fail_at(params, message, signature, Utc::now())
}

/// [`verify_or_fail`] with an explicit current instant.
pub fn verify_or_fail_at(
    params: &SiweMessageParams,
    message: &str,
    signature: &str,
    now: DateTime<Utc>,
) -> Result<(), SiweError> {
    time::validate_at(params, now)?;

    if signature::verify_message(message, signature, params.address())? {
        return Ok(());
    }

    Err(SignatureError::Invalid.into())
}

/// Values a relying party expects a received message to carry.
///
/// Unset fields are not checked. Used to confirm that a message presented
/// for sign-in matches the nonce the server issued, the server's own
/// domain, and so on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchFields {
    pub domain: Option<String>,
    pub address: Option<String>,
    pub nonce: Option<String>,
    pub uri: Option<String>,
    pub scheme: Option<String>,
    pub chain_id: Option<u64>,
    pub request_id: Option<String>,
}

/// A message field did not match the value the relying party expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateError {
    field: &'static str,
    provided: String,
    expected: String,
}

impl ValidateError {
    fn new(field: &'static str, provided: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            field,
            provided: provided.into(),
            expected: expected.into(),
        }
    }

    pub fn field(&self) -> &str {
        self.field
    }

    /// The value the message actually carried (empty for an absent field).
    pub fn provided(&self) -> &str {
        &self.provided
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }
}

impl std::fmt::Display for ValidateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid validate Sign-In with Ethereum message field \"{}\"\n", self.field)?;
        if self.provided.is_empty() {
            write!(f, "\nProvided value:")?;
        } else {
            write!(f, "\nProvided value: {}", self.provided)?;
        }
        write!(f, "\nExpected value: {}", self.expected)
    }
}

impl std::error::Error for ValidateError {}

/// Check a parameter set against expected values, collapsing to a bool.
pub fn validate(params: &SiweMessageParams, expected: &MatchFields) -> bool {
    validate_or_fail(params, expected).is_ok()
}

/// Check a parameter set against expected values.
///
/// Checks run in declaration order and stop at the first mismatch.
pub fn validate_or_fail(
    params: &SiweMessageParams,
    expected: &MatchFields,
) -> Result<(), ValidateError> {
    if let Some(domain) = &expected.domain {
        if params.domain() != domain {
            return Err(ValidateError::new("domain", params.domain(), domain));
        }
    }

    if let Some(address) = &expected.address {
        // Addresses compare case-insensitively; checksum casing is display-only.
        if !params.address().eq_ignore_ascii_case(address) {
            return Err(ValidateError::new("address", params.address(), address));
        }
    }

    if let Some(nonce) = &expected.nonce {
        if params.nonce() != nonce {
            return Err(ValidateError::new("nonce", params.nonce(), nonce));
        }
    }

    if let Some(uri) = &expected.uri {
        if params.uri() != uri {
            return Err(ValidateError::new("uri", params.uri(), uri));
        }
    }

    if let Some(scheme) = &expected.scheme {
        if params.scheme() != Some(scheme.as_str()) {
            return Err(ValidateError::new(
                "scheme",
                params.scheme().unwrap_or_default(),
                scheme,
            ));
        }
    }

    if let Some(chain_id) = expected.chain_id {
        if params.chain_id() != chain_id {
            return Err(ValidateError::new(
                "chainId",
                params.chain_id().to_string(),
                chain_id.to_string(),
            ));
        }
    }

    if let Some(request_id) = &expected.request_id {
        if params.request_id() != Some(request_id.as_str()) {
            return Err(ValidateError::new(
                "requestId",
                params.request_id().unwrap_or_default(),
                request_id,
            ));
        }
    }

    Ok(())
}

/// `0x` plus exactly 40 hex digits.
fn address_shaped(address: &str) -> bool {
    address.len() == 42
        && address.starts_with("0x")
        && address[2..].chars().all(|c| c.is_ascii_hexdigit())
}

fn expect_field<'a>(line: Option<&'a str>, prefix: &str) -> Result<&'a str, ParseError> {
    line.and_then(|line| line.strip_prefix(prefix))
        .ok_or(ParseError::Structure)
}
