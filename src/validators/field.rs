// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Field validation for SIWE message parameters.
//!
//! Checks run in a fixed order (address, chainId, domain, nonce, uri,
//! version, scheme, statement, resources) and stop at the first failing
//! field. The ordering is observable: callers relying on error messages
//! always see the earliest violated field.

use url::Url;

use crate::ethereum::address;
use crate::params::SiweMessageParams;

/// Minimum nonce length required by EIP-4361.
pub const MIN_NONCE_LENGTH: usize = 8;

/// A message field violated one or more validation rules.
///
/// Carries the field name, the offending value, and the ordered list of
/// human-readable rules the value failed; callers may surface these
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    field: &'static str,
    value: String,
    conditions: Vec<&'static str>,
}

impl FieldError {
    pub fn new(field: &'static str, value: impl Into<String>, conditions: Vec<&'static str>) -> Self {
        Self {
            field,
            value: value.into(),
            conditions,
        }
    }

    /// Name of the first field that failed validation.
    pub fn field(&self) -> &str {
        self.field
    }

    /// The offending value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The rules the value violated, in check order.
    pub fn conditions(&self) -> &[&'static str] {
        &self.conditions
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid Sign-In with Ethereum message field \"{}\".\n", self.field)?;
        for condition in &self.conditions {
            write!(f, "\n- {condition}")?;
        }
        write!(f, "\n\nProvided value: {}", self.value)
    }
}

impl std::error::Error for FieldError {}

/// Validate every field of a parameter set.
///
/// Returns the first violation in the fixed field order; later fields are
/// not evaluated once one fails.
pub fn validate(params: &SiweMessageParams) -> Result<(), FieldError> {
    if !address_validate(params.address()) {
        return Err(FieldError::new("address", params.address(), vec![
            "Address must be a hex value of 20 bytes (40 hex characters).",
            "Address must match its checksum counterpart.",
        ]));
    }

    if !chain_id_validate(params.chain_id()) {
        return Err(FieldError::new("chainId", params.chain_id().to_string(), vec![
            "Chain ID must be a EIP-155 chain ID.",
            "See https://eips.ethereum.org/EIPS/eip-155",
        ]));
    }

    if !domain_validate(params.domain()) {
        return Err(FieldError::new("domain", params.domain(), vec![
            "Domain must be an RFC 3986 authority.",
            "See https://www.rfc-editor.org/rfc/rfc3986",
        ]));
    }

    if !nonce_validate(params.nonce()) {
        return Err(FieldError::new("nonce", params.nonce(), vec![
            "Nonce must be at least 8 characters.",
            "Nonce must be alphanumeric.",
        ]));
    }

    if !uri_validate(params.uri()) {
        return Err(FieldError::new("uri", params.uri(), vec![
            "URI must be a RFC 3986 URI referring to the resource that is the subject of the signing.",
            "See https://www.rfc-editor.org/rfc/rfc3986",
        ]));
    }

    if !version_validate(params.version()) {
        return Err(FieldError::new("version", params.version(), vec![
            "Version must be '1'.",
        ]));
    }

    if let Some(scheme) = params.scheme() {
        if !scheme_validate(scheme) {
            return Err(FieldError::new("scheme", scheme, vec![
                "Scheme must be an RFC 3986 URI scheme.",
                "See https://www.rfc-editor.org/rfc/rfc3986#section-3.1",
            ]));
        }
    }

    if let Some(statement) = params.statement() {
        if !statement_validate(statement) {
            return Err(FieldError::new("statement", statement, vec![
                "Statement must not include '\\n'.",
            ]));
        }
    }

    if let Some(resources) = params.resources() {
        for resource in resources {
            if !resource_validate(resource) {
                return Err(FieldError::new("resources", resource.as_str(), vec![
                    "Every resource must be a RFC 3986 URI.",
                    "See https://www.rfc-editor.org/rfc/rfc3986",
                ]));
            }
        }
    }

    Ok(())
}

/// Ethereum address, EIP-55 checksum enforced for mixed case.
pub fn address_validate(value: &str) -> bool {
    address::is_address(value, false)
}

/// EIP-155 chain ids start at 1.
pub fn chain_id_validate(value: u64) -> bool {
    value > 0
}

/// RFC 3986 authority: a valid hostname with an optional port and nothing
/// else (no userinfo, path, query, or fragment).
pub fn domain_validate(value: &str) -> bool {
    let Ok(url) = Url::parse(&format!("https://{value}")) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };

    // Anything beyond host[:port] would break the canonical header line.
    if !url.username().is_empty() || url.password().is_some() {
        return false;
    }
    if !matches!(url.path(), "" | "/") || url.query().is_some() || url.fragment().is_some() {
        return false;
    }
    if value.contains('/') {
        return false;
    }

    hostname_validate(host)
}

/// At least 8 ASCII alphanumeric characters.
pub fn nonce_validate(value: &str) -> bool {
    value.len() >= MIN_NONCE_LENGTH && value.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Absolute RFC 3986 URI with a scheme.
pub fn uri_validate(value: &str) -> bool {
    Url::parse(value).is_ok()
}

/// The only defined SIWE version.
pub fn version_validate(value: &str) -> bool {
    value == "1"
}

/// RFC 3986 scheme: a letter followed by letters, digits, `+`, `.`, `-`.
pub fn scheme_validate(value: &str) -> bool {
    let scheme = value.to_lowercase();
    let mut chars = scheme.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}

/// Statements are single-line by definition.
pub fn statement_validate(value: &str) -> bool {
    !value.contains('\n')
}

pub fn resource_validate(value: &str) -> bool {
    uri_validate(value)
}

/// Hostname labels: non-empty, alphanumerics and hyphens, no label
/// starting or ending with a hyphen.
fn hostname_validate(host: &str) -> bool {
    !host.is_empty()
        && host.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}
