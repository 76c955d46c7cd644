//! Opaque serialized objects and the conversions that produce them.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use super::data_input::{DataInput, ObjectDataInput};
use super::data_output::{DataOutput, ObjectDataOutput};
use crate::error::{HazelcastError, Result};

/// Type id of a null object.
pub const CONSTANT_TYPE_NULL: i32 = 0;
/// Type id of a boolean.
pub const CONSTANT_TYPE_BOOLEAN: i32 = -4;
/// Type id of a 32-bit integer.
pub const CONSTANT_TYPE_INTEGER: i32 = -7;
/// Type id of a 64-bit integer.
pub const CONSTANT_TYPE_LONG: i32 = -8;
/// Type id of a string.
pub const CONSTANT_TYPE_STRING: i32 = -11;
/// Type id of a byte array.
pub const CONSTANT_TYPE_BYTE_ARRAY: i32 = -12;

const PARTITION_HASH_OFFSET: usize = 0;
const TYPE_OFFSET: usize = 4;

/// Pre-serialized bytes of a user object.
///
/// Layout: partition hash (i32 BE), type id (i32 BE), payload. The protocol
/// layer never looks inside; it is carried as the content of a single frame.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Data {
    bytes: Bytes,
}

impl Data {
    /// Size of the partition hash and type id header.
    pub const HEADER_SIZE: usize = 8;

    /// Wraps already serialized bytes.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Builds a blob from a type id and payload, with no partition hash.
    pub fn from_parts(type_id: i32, payload: &[u8]) -> Self {
        let mut buf = BytesMut::with_capacity(Self::HEADER_SIZE + payload.len());
        buf.put_i32(0);
        buf.put_i32(type_id);
        buf.put_slice(payload);
        Self::new(buf.freeze())
    }

    /// Returns the raw serialized bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the number of serialized bytes, header included.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true for an empty blob.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the serializer type id, or `CONSTANT_TYPE_NULL` when the blob
    /// is too short to carry a header.
    pub fn type_id(&self) -> i32 {
        self.header_int(TYPE_OFFSET).unwrap_or(CONSTANT_TYPE_NULL)
    }

    /// Returns the serialized object without the header.
    pub fn payload(&self) -> &[u8] {
        self.bytes.get(Self::HEADER_SIZE..).unwrap_or(&[])
    }

    /// Returns true if the header carries an explicit partition hash.
    pub fn has_partition_hash(&self) -> bool {
        self.header_int(PARTITION_HASH_OFFSET).map_or(false, |h| h != 0)
    }

    /// Returns the hash used to pick the owning partition.
    ///
    /// The explicit header value wins; otherwise the payload is hashed.
    pub fn partition_hash(&self) -> i32 {
        match self.header_int(PARTITION_HASH_OFFSET) {
            Some(hash) if hash != 0 => hash,
            _ => compute_partition_hash(self.payload()),
        }
    }

    fn header_int(&self, offset: usize) -> Option<i32> {
        let raw = self.bytes.get(offset..offset + 4)?;
        Some(i32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("type_id", &self.type_id())
            .field("len", &self.len())
            .finish()
    }
}

impl From<Bytes> for Data {
    fn from(bytes: Bytes) -> Self {
        Self::new(bytes)
    }
}

/// Converts a value into a `Data` blob.
///
/// Implemented here for the few built-in types the client needs to build
/// predicates and paging anchors; anything richer belongs to a full
/// serialization service.
pub trait ToData {
    /// Returns the serializer type id written in the header.
    fn type_id(&self) -> i32;

    /// Writes the object payload, without header.
    fn write_payload(&self, output: &mut ObjectDataOutput) -> Result<()>;

    /// Serializes into a `Data` blob with a zero partition hash.
    fn to_data(&self) -> Result<Data> {
        let mut output = ObjectDataOutput::new();
        output.write_int(0)?;
        output.write_int(self.type_id())?;
        self.write_payload(&mut output)?;
        Ok(Data::new(output.into_bytes()))
    }
}

/// Converts a `Data` blob back into a value.
pub trait FromData: Sized {
    /// Reads a payload written by a serializer with `type_id`.
    fn read_typed(type_id: i32, input: &mut ObjectDataInput<'_>) -> Result<Self>;

    /// Deserializes a `Data` blob.
    fn from_data(data: &Data) -> Result<Self> {
        let mut input = ObjectDataInput::new(data.payload());
        Self::read_typed(data.type_id(), &mut input)
    }
}

fn expect_type(expected: i32, actual: i32) -> Result<()> {
    if expected != actual {
        return Err(HazelcastError::Serialization(format!(
            "expected type id {}, found {}",
            expected, actual
        )));
    }
    Ok(())
}

impl ToData for Data {
    fn type_id(&self) -> i32 {
        Data::type_id(self)
    }

    fn write_payload(&self, output: &mut ObjectDataOutput) -> Result<()> {
        output.write_bytes(self.payload())
    }

    fn to_data(&self) -> Result<Data> {
        Ok(self.clone())
    }
}

impl FromData for Data {
    fn read_typed(type_id: i32, input: &mut ObjectDataInput<'_>) -> Result<Self> {
        let payload = input.read_bytes(input.remaining())?;
        Ok(Data::from_parts(type_id, &payload))
    }

    fn from_data(data: &Data) -> Result<Self> {
        Ok(data.clone())
    }
}

impl ToData for str {
    fn type_id(&self) -> i32 {
        CONSTANT_TYPE_STRING
    }

    fn write_payload(&self, output: &mut ObjectDataOutput) -> Result<()> {
        output.write_string(self)
    }
}

impl ToData for String {
    fn type_id(&self) -> i32 {
        CONSTANT_TYPE_STRING
    }

    fn write_payload(&self, output: &mut ObjectDataOutput) -> Result<()> {
        output.write_string(self)
    }
}

impl FromData for String {
    fn read_typed(type_id: i32, input: &mut ObjectDataInput<'_>) -> Result<Self> {
        expect_type(CONSTANT_TYPE_STRING, type_id)?;
        input.read_string()
    }
}

impl ToData for i32 {
    fn type_id(&self) -> i32 {
        CONSTANT_TYPE_INTEGER
    }

    fn write_payload(&self, output: &mut ObjectDataOutput) -> Result<()> {
        output.write_int(*self)
    }
}

impl FromData for i32 {
    fn read_typed(type_id: i32, input: &mut ObjectDataInput<'_>) -> Result<Self> {
        expect_type(CONSTANT_TYPE_INTEGER, type_id)?;
        input.read_int()
    }
}

impl ToData for i64 {
    fn type_id(&self) -> i32 {
        CONSTANT_TYPE_LONG
    }

    fn write_payload(&self, output: &mut ObjectDataOutput) -> Result<()> {
        output.write_long(*self)
    }
}

impl FromData for i64 {
    fn read_typed(type_id: i32, input: &mut ObjectDataInput<'_>) -> Result<Self> {
        expect_type(CONSTANT_TYPE_LONG, type_id)?;
        input.read_long()
    }
}

impl ToData for bool {
    fn type_id(&self) -> i32 {
        CONSTANT_TYPE_BOOLEAN
    }

    fn write_payload(&self, output: &mut ObjectDataOutput) -> Result<()> {
        output.write_bool(*self)
    }
}

impl FromData for bool {
    fn read_typed(type_id: i32, input: &mut ObjectDataInput<'_>) -> Result<Self> {
        expect_type(CONSTANT_TYPE_BOOLEAN, type_id)?;
        input.read_bool()
    }
}

impl ToData for Vec<u8> {
    fn type_id(&self) -> i32 {
        CONSTANT_TYPE_BYTE_ARRAY
    }

    fn write_payload(&self, output: &mut ObjectDataOutput) -> Result<()> {
        output.write_byte_array(self)
    }
}

impl FromData for Vec<u8> {
    fn read_typed(type_id: i32, input: &mut ObjectDataInput<'_>) -> Result<Self> {
        expect_type(CONSTANT_TYPE_BYTE_ARRAY, type_id)?;
        input.read_byte_array()
    }
}

/// Computes a partition hash for the given payload.
///
/// Uses the MurmurHash3 x86 32-bit variant with Hazelcast's seed.
pub fn compute_partition_hash(key: &[u8]) -> i32 {
    murmur_hash3_x86_32(key, 0x01000193)
}

fn murmur_hash3_x86_32(data: &[u8], seed: u32) -> i32 {
    const C1: u32 = 0xcc9e2d51;
    const C2: u32 = 0x1b873593;

    fn mix(k1: u32) -> u32 {
        k1.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2)
    }

    let mut h1 = seed;
    let mut blocks = data.chunks_exact(4);
    for block in &mut blocks {
        let k1 = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        h1 ^= mix(k1);
        h1 = h1.rotate_left(13).wrapping_mul(5).wrapping_add(0xe6546b64);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        let k1 = tail
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, b)| acc ^ ((*b as u32) << (8 * i)));
        h1 ^= mix(k1);
    }

    h1 ^= data.len() as u32;
    h1 ^= h1 >> 16;
    h1 = h1.wrapping_mul(0x85ebca6b);
    h1 ^= h1 >> 13;
    h1 = h1.wrapping_mul(0xc2b2ae35);
    h1 ^= h1 >> 16;

    h1 as i32
}
