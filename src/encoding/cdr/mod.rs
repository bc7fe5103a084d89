// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CDR (Common Data Representation) stream codec.
//!
//! Provides the byte buffer, the width-parameterized primitive dispatch,
//! and the typed codec over them, per OMG CDR with the DDS/RTPS
//! encapsulation variant.

pub mod buffer;
pub mod codec;
pub mod primitive;

pub use buffer::{BufferState, CdrBuffer, Endianness};
pub use codec::{Cdr, CdrKind, PlFlag, CDR_HEADER_SIZE};
pub use primitive::Primitive;
