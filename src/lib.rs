// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # cdrcodec
//!
//! Stream codec for the OMG Common Data Representation (CDR) wire
//! format, including the DDS/RTPS encapsulation variant.
//!
//! The library provides two building blocks:
//! - **[`CdrBuffer`]** - a contiguous byte region tracking the cursor,
//!   the alignment origin, and the stream's declared byte order. Created
//!   owning (grows on demand while encoding) or borrowing a caller
//!   region (fixed capacity).
//! - **[`Cdr`]** - the typed codec over one buffer: primitives, fixed
//!   arrays, length-prefixed sequences and strings, the encapsulation
//!   header, and per-call endianness overrides.
//!
//! Primitives are written at the natural alignment of their own width,
//! measured from the origin; the origin restarts behind the
//! encapsulation header. When the stream's declared byte order differs
//! from the host's, primitive bytes are reversed transparently on both
//! paths. A failed operation restores the observable stream state before
//! reporting, so the stream stays usable.
//!
//! ## Example: Encoding
//!
//! ```
//! use cdrcodec::{Cdr, CdrBuffer, CdrKind, Endianness};
//!
//! # fn main() -> cdrcodec::Result<()> {
//! let mut buffer = CdrBuffer::new(Endianness::Little);
//! let mut cdr = Cdr::new(&mut buffer, Endianness::Little, CdrKind::DdsCdr);
//! cdr.write_encapsulation()?;
//! cdr.serialize(42u32)?;
//! cdr.serialize_string("hello")?;
//! cdr.serialize_sequence(&[1.0f64, 2.0, 3.0])?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Decoding
//!
//! ```
//! use cdrcodec::{Cdr, CdrBuffer, CdrKind, Endianness};
//!
//! # fn main() -> cdrcodec::Result<()> {
//! let mut wire = [0x00u8, 0x01, 0x00, 0x00, 0x2A, 0x00, 0x00, 0x00];
//! let mut buffer = CdrBuffer::new_from(&mut wire, Endianness::Little);
//! let mut cdr = Cdr::new(&mut buffer, Endianness::Little, CdrKind::DdsCdr);
//! cdr.read_encapsulation()?; // follows the byte order the writer declared
//! assert_eq!(cdr.deserialize::<u32>()?, 42);
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{CodecError, Result};

// Encoding/decoding
pub mod encoding;

// Re-export the codec surface at the crate root
pub use encoding::cdr::{
    BufferState, Cdr, CdrBuffer, CdrKind, Endianness, PlFlag, Primitive, CDR_HEADER_SIZE,
};
