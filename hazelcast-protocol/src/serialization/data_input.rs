//! Big-endian object input used to read values back out of `Data` payloads.

use bytes::Buf;

use super::data::{FromData, CONSTANT_TYPE_NULL};
use crate::error::{HazelcastError, Result};

/// Trait for reading primitive values from Hazelcast's binary format.
///
/// All multi-byte values are read in big-endian byte order.
pub trait DataInput {
    /// Reads a single byte (i8).
    fn read_byte(&mut self) -> Result<i8>;

    /// Reads a boolean from a single byte.
    fn read_bool(&mut self) -> Result<bool>;

    /// Reads a 16-bit signed integer.
    fn read_short(&mut self) -> Result<i16>;

    /// Reads a 32-bit signed integer.
    fn read_int(&mut self) -> Result<i32>;

    /// Reads a 64-bit signed integer.
    fn read_long(&mut self) -> Result<i64>;

    /// Reads a 64-bit floating point value.
    fn read_double(&mut self) -> Result<f64>;

    /// Reads the specified number of raw bytes.
    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>>;

    /// Reads a byte array with an i32 length prefix.
    fn read_byte_array(&mut self) -> Result<Vec<u8>> {
        let len = self.read_int()?;
        let len = usize::try_from(len).map_err(|_| {
            HazelcastError::Serialization(format!("invalid array length: {}", len))
        })?;
        self.read_bytes(len)
    }

    /// Reads a UTF-8 string with an i32 byte-length prefix.
    fn read_string(&mut self) -> Result<String> {
        let bytes = self.read_byte_array()?;
        String::from_utf8(bytes)
            .map_err(|e| HazelcastError::Serialization(format!("invalid UTF-8 string: {}", e)))
    }
}

/// A slice-based implementation of `DataInput`.
#[derive(Debug)]
pub struct ObjectDataInput<'a> {
    buf: &'a [u8],
}

impl<'a> ObjectDataInput<'a> {
    /// Creates a new `ObjectDataInput` over the given byte slice.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Returns the number of bytes remaining to be read.
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Reads a nested object written by `ObjectDataOutput::write_object`.
    pub fn read_object<T: FromData>(&mut self) -> Result<Option<T>> {
        let type_id = self.read_int()?;
        if type_id == CONSTANT_TYPE_NULL {
            return Ok(None);
        }
        T::read_typed(type_id, self).map(Some)
    }

    fn ensure_remaining(&self, n: usize) -> Result<()> {
        if self.buf.remaining() < n {
            return Err(HazelcastError::Serialization(format!(
                "insufficient data: need {} bytes, have {}",
                n,
                self.buf.remaining()
            )));
        }
        Ok(())
    }
}

impl DataInput for ObjectDataInput<'_> {
    fn read_byte(&mut self) -> Result<i8> {
        self.ensure_remaining(1)?;
        Ok(self.buf.get_i8())
    }

    fn read_bool(&mut self) -> Result<bool> {
        self.ensure_remaining(1)?;
        Ok(self.buf.get_u8() != 0)
    }

    fn read_short(&mut self) -> Result<i16> {
        self.ensure_remaining(2)?;
        Ok(self.buf.get_i16())
    }

    fn read_int(&mut self) -> Result<i32> {
        self.ensure_remaining(4)?;
        Ok(self.buf.get_i32())
    }

    fn read_long(&mut self) -> Result<i64> {
        self.ensure_remaining(8)?;
        Ok(self.buf.get_i64())
    }

    fn read_double(&mut self) -> Result<f64> {
        self.ensure_remaining(8)?;
        Ok(self.buf.get_f64())
    }

    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        self.ensure_remaining(len)?;
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head.to_vec())
    }
}
