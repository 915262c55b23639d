// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational SIWE - Sign-In with Ethereum (EIP-4361)
//!
//! This crate builds, parses, validates, and verifies SIWE authentication
//! messages: the canonical text a wallet signs, the exact-inverse parser,
//! the EIP-4361 field and time rules, and EIP-191 signature verification
//! via secp256k1 public-key recovery.
//!
//! ## Modules
//!
//! - `params` - Validated, immutable message parameters and their builder
//! - `message` - Canonical serialization, parsing, and verification
//! - `ethereum` - Address checksum (EIP-55) and signature recovery (EIP-191)
//! - `validators` - Field and time validation rules
//! - `nonce` - Random nonce generation
//! - `time_format` - Strict ISO-8601 millisecond timestamps
//!
//! ## Example
//!
//! ```
//! use relational_siwe::params::SiweMessageParamsBuilder;
//! use relational_siwe::message;
//!
//! let params = SiweMessageParamsBuilder::new()
//!     .address("0xA0Cf798816D4b9b9866b5330EEa46a18382f251e")
//!     .chain_id(1)
//!     .domain("example.com")
//!     .uri("https://example.com/path")
//!     .build()
//!     .unwrap();
//!
//! let text = message::create(&params);
//! let roundtrip = message::parse(&text).unwrap();
//! assert_eq!(params, roundtrip);
//! ```

pub mod error;
pub mod ethereum;
pub mod message;
pub mod nonce;
pub mod params;
pub mod time_format;
pub mod validators;

pub use error::SiweError;
pub use params::{SiweMessageParams, SiweMessageParamsBuilder};
