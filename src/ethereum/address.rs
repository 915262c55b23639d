// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ethereum address validation and EIP-55 checksum handling.
//!
//! These are pure functions with no I/O; malformed input returns `false`
//! (or `None`) rather than an error.

use alloy::primitives::keccak256;

/// Check whether a string is an Ethereum address.
///
/// The string may carry a `0x` prefix and must contain exactly 40 hex
/// digits. In strict mode the mixed-case EIP-55 checksum must hold. In
/// non-strict mode an all-lowercase or all-uppercase address is accepted
/// without a checksum, matching common Ethereum tooling; a mixed-case
/// address must still checksum correctly.
pub fn is_address(address: &str, strict: bool) -> bool {
    if !matches_pattern(address) {
        return false;
    }

    if strict {
        is_valid_checksum(address)
    } else {
        is_all_same_caps(address) || is_valid_checksum(address)
    }
}

/// Encode an address in its EIP-55 checksummed form.
///
/// Returns `None` when the input does not match the address pattern.
pub fn to_checksum(address: &str) -> Option<String> {
    if !matches_pattern(address) {
        return None;
    }

    let hex = strip_prefix(address).to_lowercase();
    let hash = keccak256(hex.as_bytes());

    let checksummed: String = hex
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if c.is_ascii_alphabetic() && hash_nibble(&hash, i) > 7 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect();

    Some(format!("0x{checksummed}"))
}

/// `0x`-optional, exactly 40 hex digits, any case.
fn matches_pattern(address: &str) -> bool {
    let hex = strip_prefix(address);
    hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// True when every letter in the address shares one case.
fn is_all_same_caps(address: &str) -> bool {
    let hex = strip_prefix(address);
    hex.chars().all(|c| !c.is_ascii_uppercase()) || hex.chars().all(|c| !c.is_ascii_lowercase())
}

/// Validate the EIP-55 checksum of an address.
///
/// Keccak-256 of the lowercase hex string decides the case of each
/// alphabetic position: hash nibble > 7 means uppercase. Any position
/// with the wrong case fails the whole address.
fn is_valid_checksum(address: &str) -> bool {
    let hex = strip_prefix(address);
    let hash = keccak256(hex.to_lowercase().as_bytes());

    for (i, c) in hex.chars().enumerate() {
        if !c.is_ascii_alphabetic() {
            continue;
        }

        let nibble = hash_nibble(&hash, i);
        if (c.is_ascii_uppercase() && nibble <= 7) || (c.is_ascii_lowercase() && nibble > 7) {
            return false;
        }
    }

    true
}

fn strip_prefix(address: &str) -> &str {
    address.strip_prefix("0x").unwrap_or(address)
}

/// The `i`-th hex digit of a 32-byte hash, high nibble first.
fn hash_nibble(hash: &[u8; 32], i: usize) -> u8 {
    let byte = hash[i / 2];
    if i % 2 == 0 {
        byte >> 4
    } else {
        byte & 0x0f
    }
}
