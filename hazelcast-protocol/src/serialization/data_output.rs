//! Big-endian object output used to serialize values into `Data` payloads.

use bytes::{BufMut, BytesMut};

use super::data::{ToData, CONSTANT_TYPE_NULL};
use crate::error::Result;

/// Trait for writing primitive values in Hazelcast's binary format.
///
/// All multi-byte values are written in big-endian byte order, unlike the
/// little-endian frame codecs of the client protocol.
pub trait DataOutput {
    /// Writes a single byte (i8).
    fn write_byte(&mut self, v: i8) -> Result<()>;

    /// Writes a boolean as a single byte (0 for false, 1 for true).
    fn write_bool(&mut self, v: bool) -> Result<()>;

    /// Writes a 16-bit signed integer.
    fn write_short(&mut self, v: i16) -> Result<()>;

    /// Writes a 32-bit signed integer.
    fn write_int(&mut self, v: i32) -> Result<()>;

    /// Writes a 64-bit signed integer.
    fn write_long(&mut self, v: i64) -> Result<()>;

    /// Writes a 64-bit floating point value.
    fn write_double(&mut self, v: f64) -> Result<()>;

    /// Writes raw bytes without length prefix.
    fn write_bytes(&mut self, v: &[u8]) -> Result<()>;

    /// Writes a byte array with an i32 length prefix.
    fn write_byte_array(&mut self, v: &[u8]) -> Result<()> {
        self.write_int(v.len() as i32)?;
        self.write_bytes(v)
    }

    /// Writes a UTF-8 string with an i32 byte-length prefix.
    fn write_string(&mut self, v: &str) -> Result<()> {
        self.write_byte_array(v.as_bytes())
    }
}

/// A buffer-based implementation of `DataOutput` that can also embed
/// nested objects.
#[derive(Debug)]
pub struct ObjectDataOutput {
    buffer: BytesMut,
}

impl ObjectDataOutput {
    /// Creates a new `ObjectDataOutput` with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new `ObjectDataOutput` with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Writes a nested object: its type id, then its payload.
    pub fn write_object(&mut self, value: &dyn ToData) -> Result<()> {
        self.write_int(value.type_id())?;
        value.write_payload(self)
    }

    /// Writes a nested object that may be absent.
    pub fn write_nullable_object(&mut self, value: Option<&dyn ToData>) -> Result<()> {
        match value {
            Some(value) => self.write_object(value),
            None => self.write_int(CONSTANT_TYPE_NULL),
        }
    }

    /// Returns the written bytes as a slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Consumes the output and returns the written bytes.
    pub fn into_bytes(self) -> bytes::Bytes {
        self.buffer.freeze()
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for ObjectDataOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl DataOutput for ObjectDataOutput {
    fn write_byte(&mut self, v: i8) -> Result<()> {
        self.buffer.put_i8(v);
        Ok(())
    }

    fn write_bool(&mut self, v: bool) -> Result<()> {
        self.buffer.put_u8(u8::from(v));
        Ok(())
    }

    fn write_short(&mut self, v: i16) -> Result<()> {
        self.buffer.put_i16(v);
        Ok(())
    }

    fn write_int(&mut self, v: i32) -> Result<()> {
        self.buffer.put_i32(v);
        Ok(())
    }

    fn write_long(&mut self, v: i64) -> Result<()> {
        self.buffer.put_i64(v);
        Ok(())
    }

    fn write_double(&mut self, v: f64) -> Result<()> {
        self.buffer.put_f64(v);
        Ok(())
    }

    fn write_bytes(&mut self, v: &[u8]) -> Result<()> {
        self.buffer.put_slice(v);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_output_is_empty() {
        let output = ObjectDataOutput::default();
        assert!(output.is_empty());
        assert_eq!(output.len(), 0);
    }

    #[test]
    fn test_primitives_are_big_endian() {
        let mut output = ObjectDataOutput::new();
        output.write_short(0x0102).unwrap();
        output.write_int(0x01020304).unwrap();
        output.write_long(0x0102030405060708).unwrap();
        assert_eq!(
            output.as_bytes(),
            &[1, 2, 1, 2, 3, 4, 1, 2, 3, 4, 5, 6, 7, 8]
        );
    }

    #[test]
    fn test_write_byte_and_bool() {
        let mut output = ObjectDataOutput::new();
        output.write_byte(-1).unwrap();
        output.write_bool(true).unwrap();
        output.write_bool(false).unwrap();
        assert_eq!(output.as_bytes(), &[0xFF, 1, 0]);
    }

    #[test]
    fn test_write_string_uses_byte_length() {
        let mut output = ObjectDataOutput::new();
        output.write_string("é").unwrap();
        assert_eq!(output.as_bytes(), &[0, 0, 0, 2, 0xC3, 0xA9]);
    }

    #[test]
    fn test_write_object_prefixes_type_id() {
        let mut output = ObjectDataOutput::new();
        output.write_object(&5i32).unwrap();
        assert_eq!(output.as_bytes(), &[0xFF, 0xFF, 0xFF, 0xF9, 0, 0, 0, 5]);
    }

    #[test]
    fn test_write_null_object() {
        let mut output = ObjectDataOutput::new();
        output.write_nullable_object(None).unwrap();
        assert_eq!(output.as_bytes(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_into_bytes() {
        let mut output = ObjectDataOutput::with_capacity(4);
        output.write_int(42).unwrap();
        assert_eq!(&output.into_bytes()[..], &[0, 0, 0, 42]);
    }
}
