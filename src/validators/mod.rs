// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Validation rules for SIWE message parameters.
//!
//! - `field` - Per-field syntax and semantic rules, fixed check order
//! - `time` - Expiration and not-before windows against an explicit instant

pub mod field;
pub mod time;
