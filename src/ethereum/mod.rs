// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ethereum primitives used by SIWE verification.
//!
//! - `address` - Address syntax and EIP-55 mixed-case checksum
//! - `signature` - EIP-191 personal-sign recovery over secp256k1

pub mod address;
pub mod signature;
