//! Sequential access to the fixed-size fields of an initial frame.
//!
//! Fixed fields are laid out back-to-back in declaration order, so writing or
//! reading them in that order needs no offset tables.

use bytes::BytesMut;
use uuid::Uuid;

use super::constants::*;
use super::fixed_size;
use super::frame::Frame;
use crate::error::{HazelcastError, Result};

/// Appends fixed-size fields to a zero-filled prefix.
#[derive(Debug, Clone)]
pub struct FieldWriter {
    content: BytesMut,
}

impl Default for FieldWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldWriter {
    /// Starts an empty field block.
    pub fn new() -> Self {
        Self::with_header(0)
    }

    /// Starts after `header_size` zero bytes reserved for a message header.
    pub fn with_header(header_size: usize) -> Self {
        let mut content = BytesMut::with_capacity(header_size + 2 * LONG_SIZE_IN_BYTES);
        content.resize(header_size, 0);
        Self { content }
    }

    fn reserve(&mut self, size: usize) -> usize {
        let offset = self.content.len();
        self.content.resize(offset + size, 0);
        offset
    }

    /// Appends a signed byte.
    pub fn byte(mut self, value: i8) -> Self {
        let offset = self.reserve(BYTE_SIZE_IN_BYTES);
        fixed_size::encode_byte(&mut self.content, offset, value);
        self
    }

    /// Appends a boolean.
    pub fn boolean(mut self, value: bool) -> Self {
        let offset = self.reserve(BOOLEAN_SIZE_IN_BYTES);
        fixed_size::encode_boolean(&mut self.content, offset, value);
        self
    }

    /// Appends an i32.
    pub fn int(mut self, value: i32) -> Self {
        let offset = self.reserve(INT_SIZE_IN_BYTES);
        fixed_size::encode_int(&mut self.content, offset, value);
        self
    }

    /// Appends an i64.
    pub fn long(mut self, value: i64) -> Self {
        let offset = self.reserve(LONG_SIZE_IN_BYTES);
        fixed_size::encode_long(&mut self.content, offset, value);
        self
    }

    /// Appends an f32.
    pub fn float(mut self, value: f32) -> Self {
        let offset = self.reserve(FLOAT_SIZE_IN_BYTES);
        fixed_size::encode_float(&mut self.content, offset, value);
        self
    }

    /// Appends a nullable UUID.
    pub fn uuid(mut self, value: Option<Uuid>) -> Self {
        let offset = self.reserve(UUID_SIZE_IN_BYTES);
        fixed_size::encode_uuid(&mut self.content, offset, value);
        self
    }

    /// Number of bytes written so far, header included.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Mutable access to the bytes written so far, for patching the header.
    pub fn content_mut(&mut self) -> &mut [u8] {
        &mut self.content
    }

    /// Wraps the fields in a frame with `flags`.
    pub fn into_frame(self, flags: u16) -> Frame {
        Frame::new(self.content, flags)
    }
}

/// Reads fixed-size fields one after another.
#[derive(Debug, Clone, Copy)]
pub struct FieldReader<'a> {
    content: &'a [u8],
    position: usize,
}

impl<'a> FieldReader<'a> {
    /// Starts reading `content` at `position`.
    pub fn new(content: &'a [u8], position: usize) -> Self {
        Self { content, position }
    }

    fn advance(&mut self, size: usize) -> usize {
        let offset = self.position;
        self.position += size;
        offset
    }

    /// Reads a signed byte.
    pub fn byte(&mut self) -> Result<i8> {
        let offset = self.advance(BYTE_SIZE_IN_BYTES);
        fixed_size::decode_byte(self.content, offset)
    }

    /// Reads a boolean.
    pub fn boolean(&mut self) -> Result<bool> {
        let offset = self.advance(BOOLEAN_SIZE_IN_BYTES);
        fixed_size::decode_boolean(self.content, offset)
    }

    /// Reads an i32.
    pub fn int(&mut self) -> Result<i32> {
        let offset = self.advance(INT_SIZE_IN_BYTES);
        fixed_size::decode_int(self.content, offset)
    }

    /// Reads an i64.
    pub fn long(&mut self) -> Result<i64> {
        let offset = self.advance(LONG_SIZE_IN_BYTES);
        fixed_size::decode_long(self.content, offset)
    }

    /// Reads an f32.
    pub fn float(&mut self) -> Result<f32> {
        let offset = self.advance(FLOAT_SIZE_IN_BYTES);
        fixed_size::decode_float(self.content, offset)
    }

    /// Reads a nullable UUID.
    pub fn uuid(&mut self) -> Result<Option<Uuid>> {
        let offset = self.advance(UUID_SIZE_IN_BYTES);
        fixed_size::decode_uuid(self.content, offset)
    }

    /// Reads a UUID that must not be null.
    pub fn required_uuid(&mut self, field: &str) -> Result<Uuid> {
        self.uuid()?
            .ok_or_else(|| HazelcastError::Protocol(format!("{} must not be null", field)))
    }

    /// Bytes left after the current position.
    pub fn remaining(&self) -> usize {
        self.content.len().saturating_sub(self.position)
    }

    /// Current offset into the frame.
    pub fn position(&self) -> usize {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_are_packed_in_order() {
        let frame = FieldWriter::new()
            .int(7)
            .boolean(true)
            .long(-2)
            .into_frame(DEFAULT_FLAGS);
        assert_eq!(
            &frame.content[..],
            &[7, 0, 0, 0, 1, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
        );

        let mut reader = FieldReader::new(&frame.content, 0);
        assert_eq!(reader.int().unwrap(), 7);
        assert!(reader.boolean().unwrap());
        assert_eq!(reader.long().unwrap(), -2);
        assert_eq!(reader.remaining(), 0);
        assert!(reader.byte().is_err());
    }

    #[test]
    fn test_header_is_reserved() {
        let writer = FieldWriter::with_header(REQUEST_HEADER_SIZE).uuid(None);
        assert_eq!(writer.len(), REQUEST_HEADER_SIZE + UUID_SIZE_IN_BYTES);

        let frame = writer.into_frame(UNFRAGMENTED_MESSAGE);
        let mut reader = FieldReader::new(&frame.content, REQUEST_HEADER_SIZE);
        assert_eq!(reader.uuid().unwrap(), None);
        assert_eq!(reader.position(), frame.content.len());
    }
}
