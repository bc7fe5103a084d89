// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Encoding/decoding implementations.
//!
//! This module hosts the wire-format layer:
//! - [`cdr`] - CDR (Common Data Representation) stream codec

pub mod cdr;

pub use cdr::{BufferState, Cdr, CdrBuffer, CdrKind, Endianness, PlFlag, Primitive};
