// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Validated SIWE message parameters.
//!
//! `SiweMessageParams` is immutable and can only be obtained through the
//! builder (or serde deserialization, which funnels through the same
//! validation): an invalid parameter set is never representable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::nonce;
use crate::time_format;
use crate::validators::field::{self, FieldError};

/// The only version defined by EIP-4361.
pub const DEFAULT_VERSION: &str = "1";

/// The fields of a Sign-In with Ethereum message.
///
/// Construction applies defaults (`issued_at` = now at millisecond
/// precision, `nonce` = random, `version` = `"1"`) and then runs full
/// field validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSiweMessageParams", into = "RawSiweMessageParams")]
pub struct SiweMessageParams {
    address: String,
    chain_id: u64,
    domain: String,
    uri: String,
    issued_at: DateTime<Utc>,
    nonce: String,
    statement: Option<String>,
    version: String,
    scheme: Option<String>,
    expiration_time: Option<DateTime<Utc>>,
    not_before: Option<DateTime<Utc>>,
    request_id: Option<String>,
    resources: Option<Vec<String>>,
}

impl SiweMessageParams {
    /// The Ethereum address performing the signing.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// EIP-155 chain id (1 for Ethereum mainnet).
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// The domain that is requesting the signing.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// RFC 3986 URI referring to the resource that is the subject of the
    /// signing.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// When the message was generated.
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Replay-protection nonce chosen by the relying party.
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// Human-readable assertion the user signs.
    pub fn statement(&self) -> Option<&str> {
        self.statement.as_deref()
    }

    /// SIWE message version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// URI scheme of the origin of the request.
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// When the signed message stops being valid.
    pub fn expiration_time(&self) -> Option<DateTime<Utc>> {
        self.expiration_time
    }

    /// When the signed message becomes valid.
    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        self.not_before
    }

    /// System-specific identifier for the sign-in request.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// References the user wants resolved as part of authentication.
    pub fn resources(&self) -> Option<&[String]> {
        self.resources.as_deref()
    }
}

/// Builder for [`SiweMessageParams`].
///
/// `address`, `chain_id`, `domain`, and `uri` are required; everything
/// else is optional or defaulted at build time.
#[derive(Debug, Clone, Default)]
pub struct SiweMessageParamsBuilder {
    address: Option<String>,
    chain_id: Option<u64>,
    domain: Option<String>,
    uri: Option<String>,
    issued_at: Option<DateTime<Utc>>,
    nonce: Option<String>,
    statement: Option<String>,
    version: Option<String>,
    scheme: Option<String>,
    expiration_time: Option<DateTime<Utc>>,
    not_before: Option<DateTime<Utc>>,
    request_id: Option<String>,
    resources: Option<Vec<String>>,
}

impl SiweMessageParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn issued_at(mut self, issued_at: DateTime<Utc>) -> Self {
        self.issued_at = Some(issued_at);
        self
    }

    pub fn nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    pub fn statement(mut self, statement: impl Into<String>) -> Self {
        self.statement = Some(statement.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    pub fn expiration_time(mut self, expiration_time: DateTime<Utc>) -> Self {
        self.expiration_time = Some(expiration_time);
        self
    }

    pub fn not_before(mut self, not_before: DateTime<Utc>) -> Self {
        self.not_before = Some(not_before);
        self
    }

    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn resources(mut self, resources: Vec<String>) -> Self {
        self.resources = Some(resources);
        self
    }

    /// Build with the wall clock supplying the default `issued_at`.
    pub fn build(self) -> Result<SiweMessageParams, FieldError> {
        self.build_at(Utc::now())
    }

    /// Build with an explicit instant for the default `issued_at`.
    ///
    /// Defaults are resolved first (a pure step), then the populated
    /// parameter set is validated as a whole.
    pub fn build_at(self, now: DateTime<Utc>) -> Result<SiweMessageParams, FieldError> {
        let address = self.address.ok_or_else(|| missing("address"))?;
        let chain_id = self.chain_id.ok_or_else(|| missing("chainId"))?;
        let domain = self.domain.ok_or_else(|| missing("domain"))?;
        let uri = self.uri.ok_or_else(|| missing("uri"))?;

        let params = SiweMessageParams {
            address,
            chain_id,
            domain,
            uri,
            issued_at: self
                .issued_at
                .unwrap_or_else(|| time_format::truncate_to_millis(now)),
            nonce: self.nonce.unwrap_or_else(nonce::generate),
            // An empty statement or resource list carries nothing and is
            // normalized to absent so it never reaches the wire.
            statement: self.statement.filter(|statement| !statement.is_empty()),
            version: self.version.unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            scheme: self.scheme,
            expiration_time: self.expiration_time,
            not_before: self.not_before,
            request_id: self.request_id,
            resources: self.resources.filter(|resources| !resources.is_empty()),
        };

        field::validate(&params)?;
        Ok(params)
    }
}

fn missing(field: &'static str) -> FieldError {
    FieldError::new(field, "", vec!["Required fields are not set"])
}

/// Unvalidated mirror of [`SiweMessageParams`] used for serde, so that
/// deserialized values pass through the same builder validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSiweMessageParams {
    address: String,
    chain_id: u64,
    domain: String,
    uri: String,
    issued_at: DateTime<Utc>,
    nonce: String,
    #[serde(default)]
    statement: Option<String>,
    version: String,
    #[serde(default)]
    scheme: Option<String>,
    #[serde(default)]
    expiration_time: Option<DateTime<Utc>>,
    #[serde(default)]
    not_before: Option<DateTime<Utc>>,
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    resources: Option<Vec<String>>,
}

impl TryFrom<RawSiweMessageParams> for SiweMessageParams {
    type Error = FieldError;

    fn try_from(raw: RawSiweMessageParams) -> Result<Self, Self::Error> {
        let mut builder = SiweMessageParamsBuilder::new()
            .address(raw.address)
            .chain_id(raw.chain_id)
            .domain(raw.domain)
            .uri(raw.uri)
            .issued_at(raw.issued_at)
            .nonce(raw.nonce)
            .version(raw.version);

        if let Some(statement) = raw.statement {
            builder = builder.statement(statement);
        }
        if let Some(scheme) = raw.scheme {
            builder = builder.scheme(scheme);
        }
        if let Some(expiration_time) = raw.expiration_time {
            builder = builder.expiration_time(expiration_time);
        }
        if let Some(not_before) = raw.not_before {
            builder = builder.not_before(not_before);
        }
        if let Some(request_id) = raw.request_id {
            builder = builder.request_id(request_id);
        }
        if let Some(resources) = raw.resources {
            builder = builder.resources(resources);
        }

        builder.build()
    }
}

impl From<SiweMessageParams> for RawSiweMessageParams {
    fn from(params: SiweMessageParams) -> Self {
        Self {
            address: params.address,
            chain_id: params.chain_id,
            domain: params.domain,
            uri: params.uri,
            issued_at: params.issued_at,
            nonce: params.nonce,
            statement: params.statement,
            version: params.version,
            scheme: params.scheme,
            expiration_time: params.expiration_time,
            not_before: params.not_before,
            request_id: params.request_id,
            resources: params.resources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn base_builder() -> SiweMessageParamsBuilder {
        SiweMessageParamsBuilder::new()
            .address("0xA0Cf798816D4b9b9866b5330EEa46a18382f251e")
            .chain_id(1)
            .domain("example.com")
            .uri("https://example.com/path")
    }

    #[test]
    fn applies_defaults() {
        let now = Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap();
        let params = base_builder().build_at(now).unwrap();

        assert_eq!(params.version(), "1");
        assert_eq!(params.issued_at(), now);
        assert_eq!(params.nonce().len(), 32);
        assert!(params.nonce().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn default_issued_at_is_millisecond_precise() {
        let now = Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap()
            + chrono::Duration::nanoseconds(999_999);
        let params = base_builder().build_at(now).unwrap();

        assert_eq!(params.issued_at().timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let issued_at = Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap();
        let params = base_builder()
            .issued_at(issued_at)
            .nonce("foobarbaz")
            .version("1")
            .build()
            .unwrap();

        assert_eq!(params.issued_at(), issued_at);
        assert_eq!(params.nonce(), "foobarbaz");
    }

    #[test]
    fn missing_required_field_fails() {
        let err = SiweMessageParamsBuilder::new()
            .chain_id(1)
            .domain("example.com")
            .uri("https://example.com/path")
            .build()
            .unwrap_err();

        assert_eq!(err.field(), "address");
        assert_eq!(err.conditions(), ["Required fields are not set"]);
    }

    #[test]
    fn invalid_nonce_reports_both_rules() {
        let err = base_builder().nonce("#foo").build().unwrap_err();

        assert_eq!(err.field(), "nonce");
        assert_eq!(err.value(), "#foo");
        assert_eq!(
            err.conditions(),
            [
                "Nonce must be at least 8 characters.",
                "Nonce must be alphanumeric.",
            ]
        );
        assert_eq!(
            err.to_string(),
            "Invalid Sign-In with Ethereum message field \"nonce\".\n\
             \n\
             - Nonce must be at least 8 characters.\n\
             - Nonce must be alphanumeric.\n\
             \n\
             Provided value: #foo"
        );
    }

    #[test]
    fn first_invalid_field_wins() {
        // Both address and chainId are invalid; address is reported.
        let err = SiweMessageParamsBuilder::new()
            .address("0xfoobarbaz")
            .chain_id(0)
            .domain("example.com")
            .uri("https://example.com/path")
            .build()
            .unwrap_err();

        assert_eq!(err.field(), "address");
    }

    #[test]
    fn chain_id_zero_is_rejected() {
        let err = base_builder().chain_id(0).build().unwrap_err();
        assert_eq!(err.field(), "chainId");
        assert_eq!(err.value(), "0");
    }

    #[test]
    fn empty_optionals_normalize_to_absent() {
        let params = base_builder()
            .statement("")
            .resources(vec![])
            .build()
            .unwrap();

        assert_eq!(params.statement(), None);
        assert_eq!(params.resources(), None);
    }

    #[test]
    fn invalid_statement_is_rejected() {
        let err = base_builder().statement("foo\nbar").build().unwrap_err();
        assert_eq!(err.field(), "statement");
    }

    #[test]
    fn invalid_resource_reports_the_offending_entry() {
        let err = base_builder()
            .resources(vec!["https://example.com".into(), "foo".into()])
            .build()
            .unwrap_err();

        assert_eq!(err.field(), "resources");
        assert_eq!(err.value(), "foo");
    }

    #[test]
    fn serde_round_trip() {
        let params = base_builder()
            .issued_at(Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap())
            .nonce("foobarbaz")
            .statement("I accept the Terms of Service")
            .build()
            .unwrap();

        let json = serde_json::to_string(&params).unwrap();
        let back: SiweMessageParams = serde_json::from_str(&json).unwrap();
        assert_eq!(params, back);
    }

    #[test]
    fn serde_rejects_invalid_params() {
        let json = r#"{
            "address": "0xfoobarbaz",
            "chain_id": 1,
            "domain": "example.com",
            "uri": "https://example.com/path",
            "issued_at": "2023-02-01T00:00:00Z",
            "nonce": "foobarbaz",
            "version": "1"
        }"#;

        let result: Result<SiweMessageParams, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
