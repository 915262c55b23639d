// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EIP-191 personal-sign verification via secp256k1 public-key recovery.
//!
//! A wallet signature is 65 bytes: `r` (32) || `s` (32) || `v` (1), hex
//! encoded with an optional `0x` prefix. The trailing `v` byte must be 27
//! or 28; anything else is rejected rather than masked.

use alloy::primitives::keccak256;
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};

/// Ethereum personal_sign prefix from EIP-191.
pub const MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Errors raised by signature parsing and recovery.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("signature must be 65 bytes of hex (r, s, v)")]
    Malformed,

    #[error("v can only be 27 or 28")]
    InvalidRecoveryId,

    #[error("public key recovery failed: {0}")]
    Recovery(k256::ecdsa::Error),

    #[error("Signature invalid")]
    Invalid,
}

/// Recover the signer address from a raw (unprefixed) message.
///
/// Hashes the message with Keccak-256, recovers the secp256k1 public key
/// from `(hash, r, s, v - 27)`, and derives the address as the last 20
/// bytes of the Keccak-256 hash of the uncompressed public key body.
///
/// # Returns
/// The signer address as a lowercase `0x`-prefixed hex string.
pub fn recover_address(message: &str, signature: &str) -> Result<String, SignatureError> {
    let sig_bytes = decode_signature(signature)?;
    let hash = keccak256(message.as_bytes());

    let recovery_id = match sig_bytes[64] {
        27 => RecoveryId::try_from(0u8),
        28 => RecoveryId::try_from(1u8),
        _ => return Err(SignatureError::InvalidRecoveryId),
    }
    .map_err(|_| SignatureError::InvalidRecoveryId)?;

    let ecdsa_sig =
        EcdsaSignature::from_slice(&sig_bytes[..64]).map_err(SignatureError::Recovery)?;

    let verifying_key = VerifyingKey::recover_from_prehash(hash.as_slice(), &ecdsa_sig, recovery_id)
        .map_err(SignatureError::Recovery)?;

    // Uncompressed SEC1 point: 0x04 prefix byte then 64 bytes of X || Y.
    let point = verifying_key.to_encoded_point(false);
    let address_hash = keccak256(&point.as_bytes()[1..]);

    Ok(format!("0x{}", alloy::hex::encode(&address_hash[12..])))
}

/// Verify an EIP-191 personal-sign signature against a claimed address.
///
/// Prepends `"\x19Ethereum Signed Message:\n" + byte length` to the
/// message before hashing, as wallets do for `personal_sign`. The address
/// comparison is case-insensitive.
///
/// Returns `Ok(false)` when the signature is well-formed but was produced
/// by a different key; structural problems propagate as errors.
pub fn verify_message(
    message: &str,
    signature: &str,
    address: &str,
) -> Result<bool, SignatureError> {
    let prefixed = format!("{}{}{}", MESSAGE_PREFIX, message.len(), message);
    let signer = recover_address(&prefixed, signature)?;

    Ok(address.to_lowercase() == signer)
}

/// Decode a 65-byte hex signature, `0x` prefix optional.
fn decode_signature(signature: &str) -> Result<[u8; 65], SignatureError> {
    let hex = signature.strip_prefix("0x").unwrap_or(signature);
    let bytes = alloy::hex::decode(hex).map_err(|_| SignatureError::Malformed)?;

    bytes.try_into().map_err(|_| SignatureError::Malformed)
}
