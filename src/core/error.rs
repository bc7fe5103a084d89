// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for cdrcodec.
//!
//! A CDR stream can fail in exactly two ways:
//! - The buffer runs out: the encoder could not grow its storage, the
//!   decoder reached end of input, or an external buffer is full.
//! - The input is malformed: a boolean byte outside {0, 1}, a
//!   parameter-list encapsulation on a stream kind that cannot carry one,
//!   or a string payload that is not valid UTF-8.

use std::fmt;

/// Errors that can occur during CDR stream operations.
///
/// Every failing operation restores the pre-call buffer state before
/// surfacing one of these, so the stream stays usable: the caller may
/// retry with a different operation or a larger buffer.
#[derive(Debug, Clone)]
pub enum CodecError {
    /// Buffer exhaustion on either side of the stream
    NotEnoughMemory {
        /// Bytes needed to complete the operation, padding included
        requested: usize,
        /// Bytes that were available at the point of failure
        available: usize,
        /// Cursor position when the error occurred
        position: usize,
    },

    /// Malformed input or an illegal parameter
    BadParam {
        /// What was malformed
        context: String,
    },
}

impl CodecError {
    /// Create a "not enough memory" error.
    pub fn not_enough_memory(requested: usize, available: usize, position: usize) -> Self {
        CodecError::NotEnoughMemory {
            requested,
            available,
            position,
        }
    }

    /// Create a bad parameter error.
    pub fn bad_param(context: impl Into<String>) -> Self {
        CodecError::BadParam {
            context: context.into(),
        }
    }

    /// Check if this is a buffer exhaustion error.
    pub fn is_not_enough_memory(&self) -> bool {
        matches!(self, CodecError::NotEnoughMemory { .. })
    }

    /// Check if this is a malformed input error.
    pub fn is_bad_param(&self) -> bool {
        matches!(self, CodecError::BadParam { .. })
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::NotEnoughMemory {
                requested,
                available,
                position,
            } => write!(
                f,
                "Not enough memory: requested {requested} bytes at position {position}, but only {available} bytes available"
            ),
            CodecError::BadParam { context } => {
                write!(f, "Bad parameter: {context}")
            }
        }
    }
}

impl std::error::Error for CodecError {}

/// Result type for cdrcodec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
