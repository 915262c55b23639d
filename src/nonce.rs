// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Random nonce generation for SIWE messages.

use uuid::Uuid;

/// Generate a random EIP-4361 nonce.
///
/// Returns 32 lowercase hex characters backed by 16 bytes from the
/// operating system's secure random source, comfortably above the
/// 8-alphanumeric-character minimum the standard requires.
pub fn generate() -> String {
    Uuid::new_v4().simple().to_string()
}
