// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout cdrcodec.
//!
//! This module provides the foundational types for the library:
//! - [`CodecError`] - Error type covering both failure conditions
//! - [`Result`] - Result alias used by every fallible operation

pub mod error;

pub use error::{CodecError, Result};
