// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Typed CDR stream operations over a [`CdrBuffer`].
//!
//! [`Cdr`] is a thin controller borrowing exactly one buffer. It manages
//! the optional DDS encapsulation header, runs every primitive through a
//! single width-parameterized path, and offers per-call endianness
//! overrides. Apart from the header-derived fields (the parameter-list
//! flag and the 16-bit options word) it is stateless; all stream state
//! lives in the buffer.
//!
//! Every operation either completes fully or restores the observable
//! state it started from before reporting an error.

use crate::core::{CodecError, Result};

use super::buffer::{BufferState, CdrBuffer, Endianness};
use super::primitive::Primitive;

/// Size of the DDS encapsulation header (4 bytes).
pub const CDR_HEADER_SIZE: usize = 4;

/// Encapsulation kind bit flagging a parameter-list payload.
const WITH_PL_BIT: u8 = 0x02;

/// Stream framing variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CdrKind {
    /// Raw CDR stream without an encapsulation header.
    CorbaCdr,
    /// DDS/RTPS stream prefixed by a 4-byte encapsulation header.
    #[default]
    DdsCdr,
}

/// Whether a DDS payload is a packed struct or a tagged parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlFlag {
    /// Plain packed payload.
    #[default]
    WithoutPl,
    /// Parameter-list payload; only meaningful on [`CdrKind::DdsCdr`].
    WithPl,
}

/// CDR stream codec.
///
/// Borrows one [`CdrBuffer`] for its whole lifetime; the buffer outlives
/// the codec and can be rewrapped later (for example to decode what was
/// just encoded).
///
/// # Example
///
/// ```
/// use cdrcodec::{Cdr, CdrBuffer, CdrKind, Endianness};
///
/// # fn main() -> cdrcodec::Result<()> {
/// let mut buffer = CdrBuffer::new(Endianness::Little);
/// let mut cdr = Cdr::new(&mut buffer, Endianness::Little, CdrKind::DdsCdr);
/// cdr.write_encapsulation()?;
/// cdr.serialize(1i16)?;
/// cdr.serialize(2i32)?; // two pad bytes inserted before this one
/// # Ok(())
/// # }
/// ```
pub struct Cdr<'a, 'b> {
    /// The stream's buffer; relation, not ownership
    buffer: &'a mut CdrBuffer<'b>,
    /// Framing variant
    kind: CdrKind,
    /// Parameter-list flag carried by the encapsulation header
    pl_flag: PlFlag,
    /// Options word carried by the encapsulation header
    options: u16,
}

impl<'a, 'b> Cdr<'a, 'b> {
    /// Create a codec over `buffer`, declaring the stream byte order.
    ///
    /// The declaration replaces whatever the buffer held before; the swap
    /// flag is rederived against the host order.
    pub fn new(buffer: &'a mut CdrBuffer<'b>, endianness: Endianness, kind: CdrKind) -> Self {
        buffer.set_stream_endianness(endianness);
        Self {
            buffer,
            kind,
            pl_flag: PlFlag::default(),
            options: 0,
        }
    }

    /// Stream framing variant.
    #[must_use]
    pub fn kind(&self) -> CdrKind {
        self.kind
    }

    /// Parameter-list flag, as configured or as read from the header.
    #[must_use]
    pub fn pl_flag(&self) -> PlFlag {
        self.pl_flag
    }

    /// Declare the payload a parameter list for the next written header.
    pub fn set_pl_flag(&mut self, pl_flag: PlFlag) {
        self.pl_flag = pl_flag;
    }

    /// Options word, as configured or as read from the header.
    #[must_use]
    pub fn options(&self) -> u16 {
        self.options
    }

    /// Set the options word for the next written header.
    pub fn set_options(&mut self, options: u16) {
        self.options = options;
    }

    /// Current cursor offset from the start of the buffer.
    #[must_use]
    pub fn position(&self) -> usize {
        self.buffer.position()
    }

    /// Capture the observable stream state for a later [`Cdr::restore`].
    #[must_use]
    pub fn snapshot(&self) -> BufferState {
        self.buffer.snapshot()
    }

    /// Reinstate a previously captured stream state.
    pub fn restore(&mut self, state: &BufferState) {
        self.buffer.restore(state);
    }

    /// Set the alignment origin to the current cursor.
    pub fn reset_alignment(&mut self) {
        self.buffer.reset_alignment();
    }

    // ------------------------------------------------------------------
    // Encapsulation header
    // ------------------------------------------------------------------

    /// Write the encapsulation header and restart alignment behind it.
    ///
    /// For [`CdrKind::DdsCdr`] this is the 4-byte prefix
    /// `[0x00, kind, options_hi, options_lo]`; for [`CdrKind::CorbaCdr`]
    /// only the kind byte is emitted. The kind byte's low bit declares
    /// the stream byte order and bit `0x02` the parameter-list mode.
    pub fn write_encapsulation(&mut self) -> Result<()> {
        let state = self.buffer.snapshot();
        match self.write_encapsulation_inner() {
            Ok(()) => {
                self.buffer.reset_alignment();
                Ok(())
            }
            Err(err) => {
                self.buffer.restore(&state);
                Err(err)
            }
        }
    }

    fn write_encapsulation_inner(&mut self) -> Result<()> {
        if self.kind == CdrKind::DdsCdr {
            self.serialize(0u8)?;
        }
        let mut kind_byte = self.buffer.endianness().wire_bit();
        if self.kind == CdrKind::DdsCdr && self.pl_flag == PlFlag::WithPl {
            kind_byte |= WITH_PL_BIT;
        }
        self.serialize(kind_byte)?;
        if self.kind == CdrKind::DdsCdr {
            self.serialize(self.options)?;
        }
        Ok(())
    }

    /// Read the encapsulation header and restart alignment behind it.
    ///
    /// The stream's byte order follows the writer's declaration: if the
    /// kind byte's low bit disagrees with the declared endianness, the
    /// swap flag is flipped and the declaration updated. A parameter-list
    /// bit on a non-DDS stream is rejected. Failure restores the codec
    /// and buffer to their pre-call state.
    pub fn read_encapsulation(&mut self) -> Result<()> {
        let state = self.buffer.snapshot();
        let endianness = self.buffer.endianness();
        let pl_flag = self.pl_flag;
        let options = self.options;
        match self.read_encapsulation_inner() {
            Ok(()) => {
                self.buffer.reset_alignment();
                Ok(())
            }
            Err(err) => {
                self.buffer.restore(&state);
                self.buffer.set_endianness(endianness);
                self.pl_flag = pl_flag;
                self.options = options;
                Err(err)
            }
        }
    }

    fn read_encapsulation_inner(&mut self) -> Result<()> {
        if self.kind == CdrKind::DdsCdr {
            let _dummy: u8 = self.deserialize()?;
        }

        let kind_byte: u8 = self.deserialize()?;

        let declared = Endianness::from_wire_bit(kind_byte);
        if declared != self.buffer.endianness() {
            tracing::debug!(
                ?declared,
                "encapsulation declares the opposite byte order, following the writer"
            );
            self.buffer.set_swap(!self.buffer.swap());
            self.buffer.set_endianness(declared);
        }

        if kind_byte & WITH_PL_BIT != 0 {
            if self.kind != CdrKind::DdsCdr {
                return Err(CodecError::bad_param(
                    "parameter-list encapsulation on a non-DDS stream",
                ));
            }
            self.pl_flag = PlFlag::WithPl;
        }

        if self.kind == CdrKind::DdsCdr {
            self.options = self.deserialize()?;
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Primitives
    // ------------------------------------------------------------------

    /// Serialize one primitive, padding to its natural alignment first.
    ///
    /// Owned buffers grow on demand; borrowed buffers fail with
    /// [`CodecError::NotEnoughMemory`] once full, leaving the state
    /// unchanged.
    pub fn serialize<T: Primitive>(&mut self, value: T) -> Result<()> {
        let padding = self.buffer.align_padding(T::WIDTH);
        let needed = padding + T::WIDTH;
        if !self.buffer.has_space(needed) && !self.buffer.grow(needed) {
            return Err(CodecError::not_enough_memory(
                needed,
                self.buffer.remaining(),
                self.buffer.position(),
            ));
        }

        self.buffer.consume_align_write(padding);
        let swap = self.buffer.swap() && T::WIDTH > 1;
        let dst = self.buffer.write_slice(T::WIDTH);
        value.write_ne(dst);
        if swap {
            dst.reverse();
        }
        self.buffer.set_last_data_size(T::WIDTH);
        Ok(())
    }

    /// Serialize one primitive in the given byte order, regardless of the
    /// stream's declared order.
    ///
    /// The swap override lasts only for this call; the declared order is
    /// untouched.
    pub fn serialize_with_endianness<T: Primitive>(
        &mut self,
        value: T,
        endianness: Endianness,
    ) -> Result<()> {
        let saved = self.buffer.swap();
        self.buffer
            .set_swap(saved != (endianness != self.buffer.endianness()));
        let result = self.serialize(value);
        self.buffer.set_swap(saved);
        result
    }

    /// Deserialize one primitive, skipping its alignment padding first.
    ///
    /// Never grows the buffer; insufficient input fails with
    /// [`CodecError::NotEnoughMemory`] and leaves the state unchanged.
    /// A boolean byte outside {0, 1} fails with [`CodecError::BadParam`].
    pub fn deserialize<T: Primitive>(&mut self) -> Result<T> {
        let padding = self.buffer.align_padding(T::WIDTH);
        let needed = padding + T::WIDTH;
        if !self.buffer.has_space(needed) {
            return Err(CodecError::not_enough_memory(
                needed,
                self.buffer.remaining(),
                self.buffer.position(),
            ));
        }

        let state = self.buffer.snapshot();
        self.buffer.consume_align_read(padding);
        let swap = self.buffer.swap() && T::WIDTH > 1;
        let mut bytes = [0u8; 8];
        bytes[..T::WIDTH].copy_from_slice(self.buffer.read_slice(T::WIDTH));
        if swap {
            bytes[..T::WIDTH].reverse();
        }

        match T::read_ne(&bytes[..T::WIDTH]) {
            Ok(value) => {
                self.buffer.set_last_data_size(T::WIDTH);
                Ok(value)
            }
            Err(err) => {
                self.buffer.restore(&state);
                Err(err)
            }
        }
    }

    /// Deserialize one primitive in the given byte order, regardless of
    /// the stream's declared order.
    pub fn deserialize_with_endianness<T: Primitive>(
        &mut self,
        endianness: Endianness,
    ) -> Result<T> {
        let saved = self.buffer.swap();
        self.buffer
            .set_swap(saved != (endianness != self.buffer.endianness()));
        let result = self.deserialize();
        self.buffer.set_swap(saved);
        result
    }

    // ------------------------------------------------------------------
    // Arrays
    // ------------------------------------------------------------------

    /// Serialize a fixed array of primitives.
    ///
    /// The array aligns once at its head for the element width; elements
    /// then follow back to back.
    pub fn serialize_array<T: Primitive>(&mut self, values: &[T]) -> Result<()> {
        let padding = self.buffer.align_padding(T::WIDTH);
        let total = values.len() * T::WIDTH;
        let needed = padding + total;
        if !self.buffer.has_space(needed) && !self.buffer.grow(needed) {
            return Err(CodecError::not_enough_memory(
                needed,
                self.buffer.remaining(),
                self.buffer.position(),
            ));
        }

        self.buffer.consume_align_write(padding);
        let swap = self.buffer.swap() && T::WIDTH > 1;
        let dst = self.buffer.write_slice(total);
        for (value, chunk) in values.iter().zip(dst.chunks_exact_mut(T::WIDTH)) {
            value.write_ne(chunk);
            if swap {
                chunk.reverse();
            }
        }
        self.buffer.set_last_data_size(T::WIDTH);
        Ok(())
    }

    /// Serialize a fixed array in the given byte order.
    pub fn serialize_array_with_endianness<T: Primitive>(
        &mut self,
        values: &[T],
        endianness: Endianness,
    ) -> Result<()> {
        let saved = self.buffer.swap();
        self.buffer
            .set_swap(saved != (endianness != self.buffer.endianness()));
        let result = self.serialize_array(values);
        self.buffer.set_swap(saved);
        result
    }

    /// Deserialize a fixed array of `count` primitives.
    pub fn deserialize_array<T: Primitive>(&mut self, count: usize) -> Result<Vec<T>> {
        let padding = self.buffer.align_padding(T::WIDTH);
        let total = count.saturating_mul(T::WIDTH);
        let needed = total.saturating_add(padding);
        if !self.buffer.has_space(needed) {
            return Err(CodecError::not_enough_memory(
                needed,
                self.buffer.remaining(),
                self.buffer.position(),
            ));
        }

        let state = self.buffer.snapshot();
        self.buffer.consume_align_read(padding);
        let swap = self.buffer.swap() && T::WIDTH > 1;
        let mut values = Vec::with_capacity(count);
        let mut result = Ok(());
        {
            let src = self.buffer.read_slice(total);
            let mut bytes = [0u8; 8];
            for chunk in src.chunks_exact(T::WIDTH) {
                bytes[..T::WIDTH].copy_from_slice(chunk);
                if swap {
                    bytes[..T::WIDTH].reverse();
                }
                match T::read_ne(&bytes[..T::WIDTH]) {
                    Ok(value) => values.push(value),
                    Err(err) => {
                        result = Err(err);
                        break;
                    }
                }
            }
        }

        match result {
            Ok(()) => {
                self.buffer.set_last_data_size(T::WIDTH);
                Ok(values)
            }
            Err(err) => {
                self.buffer.restore(&state);
                Err(err)
            }
        }
    }

    /// Deserialize a fixed array in the given byte order.
    pub fn deserialize_array_with_endianness<T: Primitive>(
        &mut self,
        count: usize,
        endianness: Endianness,
    ) -> Result<Vec<T>> {
        let saved = self.buffer.swap();
        self.buffer
            .set_swap(saved != (endianness != self.buffer.endianness()));
        let result = self.deserialize_array(count);
        self.buffer.set_swap(saved);
        result
    }

    // ------------------------------------------------------------------
    // Strings
    // ------------------------------------------------------------------

    /// Serialize a string: u32 length, then the raw bytes.
    ///
    /// The length excludes any terminator and the body is not aligned.
    /// Failure restores the pre-call state, including an already written
    /// length prefix.
    pub fn serialize_string(&mut self, value: &str) -> Result<()> {
        let state = self.buffer.snapshot();
        self.serialize(value.len() as u32)?;

        if !value.is_empty() {
            let length = value.len();
            if !self.buffer.has_space(length) && !self.buffer.grow(length) {
                let err = CodecError::not_enough_memory(
                    length,
                    self.buffer.remaining(),
                    self.buffer.position(),
                );
                self.buffer.restore(&state);
                return Err(err);
            }
            self.buffer.write_slice(length).copy_from_slice(value.as_bytes());
        }
        self.buffer.set_last_data_size(1);
        Ok(())
    }

    /// Serialize a string in the given byte order (affects the length
    /// prefix).
    pub fn serialize_string_with_endianness(
        &mut self,
        value: &str,
        endianness: Endianness,
    ) -> Result<()> {
        let saved = self.buffer.swap();
        self.buffer
            .set_swap(saved != (endianness != self.buffer.endianness()));
        let result = self.serialize_string(value);
        self.buffer.set_swap(saved);
        result
    }

    /// Deserialize a string.
    ///
    /// A zero length yields the empty string. Otherwise the next `length`
    /// bytes form the body, with exactly one trailing NUL stripped if
    /// present. A body that is not valid UTF-8 fails with
    /// [`CodecError::BadParam`]; any failure restores the pre-call state.
    pub fn deserialize_string(&mut self) -> Result<String> {
        let state = self.buffer.snapshot();
        let length = self.deserialize::<u32>()? as usize;

        if length == 0 {
            self.buffer.set_last_data_size(1);
            return Ok(String::new());
        }

        if !self.buffer.has_space(length) {
            let err = CodecError::not_enough_memory(
                length,
                self.buffer.remaining(),
                self.buffer.position(),
            );
            self.buffer.restore(&state);
            return Err(err);
        }

        let body = {
            let src = self.buffer.read_slice(length);
            let end = if src[length - 1] == 0 { length - 1 } else { length };
            src[..end].to_vec()
        };

        match String::from_utf8(body) {
            Ok(value) => {
                self.buffer.set_last_data_size(1);
                Ok(value)
            }
            Err(_) => {
                self.buffer.restore(&state);
                Err(CodecError::bad_param("string payload is not valid UTF-8"))
            }
        }
    }

    /// Deserialize a string in the given byte order (affects the length
    /// prefix).
    pub fn deserialize_string_with_endianness(
        &mut self,
        endianness: Endianness,
    ) -> Result<String> {
        let saved = self.buffer.swap();
        self.buffer
            .set_swap(saved != (endianness != self.buffer.endianness()));
        let result = self.deserialize_string();
        self.buffer.set_swap(saved);
        result
    }

    // ------------------------------------------------------------------
    // Sequences
    // ------------------------------------------------------------------

    /// Serialize a sequence: u32 element count, then the element array
    /// aligned at its head.
    pub fn serialize_sequence<T: Primitive>(&mut self, values: &[T]) -> Result<()> {
        let state = self.buffer.snapshot();
        self.serialize(values.len() as u32)?;
        if let Err(err) = self.serialize_array(values) {
            self.buffer.restore(&state);
            return Err(err);
        }
        Ok(())
    }

    /// Serialize a sequence in the given byte order.
    pub fn serialize_sequence_with_endianness<T: Primitive>(
        &mut self,
        values: &[T],
        endianness: Endianness,
    ) -> Result<()> {
        let saved = self.buffer.swap();
        self.buffer
            .set_swap(saved != (endianness != self.buffer.endianness()));
        let result = self.serialize_sequence(values);
        self.buffer.set_swap(saved);
        result
    }

    /// Deserialize a sequence of any length.
    ///
    /// The element count is still validated against the remaining input
    /// before any allocation, so a hostile count cannot trigger a huge
    /// allocation.
    pub fn deserialize_sequence<T: Primitive>(&mut self) -> Result<Vec<T>> {
        self.deserialize_bounded_sequence(usize::MAX)
    }

    /// Deserialize a sequence, rejecting counts above `max_elements`.
    ///
    /// A count beyond the bound restores the pre-call state (the count
    /// prefix included) and fails with [`CodecError::NotEnoughMemory`].
    pub fn deserialize_bounded_sequence<T: Primitive>(
        &mut self,
        max_elements: usize,
    ) -> Result<Vec<T>> {
        let state = self.buffer.snapshot();
        let count = self.deserialize::<u32>()? as usize;

        if count > max_elements {
            let err = CodecError::not_enough_memory(
                count.saturating_mul(T::WIDTH),
                max_elements.saturating_mul(T::WIDTH),
                self.buffer.position(),
            );
            self.buffer.restore(&state);
            return Err(err);
        }

        match self.deserialize_array(count) {
            Ok(values) => Ok(values),
            Err(err) => {
                self.buffer.restore(&state);
                Err(err)
            }
        }
    }

    /// Deserialize a bounded sequence in the given byte order.
    pub fn deserialize_bounded_sequence_with_endianness<T: Primitive>(
        &mut self,
        max_elements: usize,
        endianness: Endianness,
    ) -> Result<Vec<T>> {
        let saved = self.buffer.swap();
        self.buffer
            .set_swap(saved != (endianness != self.buffer.endianness()));
        let result = self.deserialize_bounded_sequence(max_elements);
        self.buffer.set_swap(saved);
        result
    }

    // ------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------

    /// Advance the cursor by `count` bytes without transferring data.
    ///
    /// The width of the last transferred primitive is untouched, so the
    /// alignment of the next operation is still measured from the origin.
    pub fn jump(&mut self, count: usize) -> Result<()> {
        if !self.buffer.has_space(count) {
            return Err(CodecError::not_enough_memory(
                count,
                self.buffer.remaining(),
                self.buffer.position(),
            ));
        }
        self.buffer.advance(count);
        Ok(())
    }
}
