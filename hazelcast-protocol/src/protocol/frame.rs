//! Frame type for the Hazelcast Open Binary Protocol.

use bytes::{Buf, BufMut, BytesMut};

use super::constants::*;
use crate::error::{HazelcastError, Result};

/// A single frame in the Hazelcast protocol.
///
/// On the wire each frame consists of:
/// - A 4-byte length field (little-endian), counting the whole frame
///   including this 6-byte header
/// - A 2-byte flags field (little-endian)
/// - Variable-length content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The frame content (payload after flags).
    pub content: BytesMut,
    /// Frame flags indicating frame type and properties.
    pub flags: u16,
}

impl Frame {
    /// Creates a new frame with the given content and flags.
    pub fn new(content: BytesMut, flags: u16) -> Self {
        Self { content, flags }
    }

    /// Creates a new frame with content and default flags.
    pub fn with_content(content: BytesMut) -> Self {
        Self::new(content, DEFAULT_FLAGS)
    }

    /// Creates a frame holding a copy of the given bytes.
    pub fn from_slice(content: &[u8]) -> Self {
        Self::with_content(BytesMut::from(content))
    }

    /// Creates a new empty frame with the given flags.
    pub fn with_flags(flags: u16) -> Self {
        Self::new(BytesMut::new(), flags)
    }

    /// Creates a zero-filled frame of the given size.
    ///
    /// Used for initial frames whose fixed-width fields are written at offsets.
    pub fn zeroed(size: usize, flags: u16) -> Self {
        Self::new(BytesMut::zeroed(size), flags)
    }

    /// Creates an empty frame opening a nested data structure.
    pub fn new_begin_frame() -> Self {
        Self::with_flags(BEGIN_DATA_STRUCTURE_FLAG)
    }

    /// Creates an empty frame closing a nested data structure.
    pub fn new_end_frame() -> Self {
        Self::with_flags(END_DATA_STRUCTURE_FLAG)
    }

    /// Creates a null frame (represents an absent value).
    pub fn new_null_frame() -> Self {
        Self::with_flags(IS_NULL_FLAG)
    }

    /// Returns true if all bits of `flag` are set on this frame.
    pub fn is_flag_set(&self, flag: u16) -> bool {
        self.flags & flag == flag
    }

    /// Returns true if this frame opens a nested data structure.
    pub fn is_begin_frame(&self) -> bool {
        self.flags & BEGIN_DATA_STRUCTURE_FLAG != 0
    }

    /// Returns true if this frame closes a nested data structure.
    pub fn is_end_frame(&self) -> bool {
        self.flags & END_DATA_STRUCTURE_FLAG != 0
    }

    /// Returns true if this frame has the NULL flag set.
    pub fn is_null_frame(&self) -> bool {
        self.flags & IS_NULL_FLAG != 0
    }

    /// Returns true if this frame has the FINAL flag set.
    pub fn is_final_frame(&self) -> bool {
        self.flags & IS_FINAL_FLAG != 0
    }

    /// Returns true if this frame has the EVENT flag set.
    pub fn is_event_frame(&self) -> bool {
        self.flags & IS_EVENT_FLAG != 0
    }

    /// Returns true if this frame has the BACKUP_EVENT flag set.
    pub fn is_backup_event_frame(&self) -> bool {
        self.flags & BACKUP_EVENT_FLAG != 0
    }

    /// Returns the size of this frame on the wire.
    ///
    /// This includes the 4-byte length field, 2-byte flags, and content.
    /// It is also the value written in the length field.
    pub fn wire_size(&self) -> usize {
        FRAME_HEADER_SIZE + self.content.len()
    }

    /// Writes this frame to the given buffer with its own flags.
    pub fn write_to(&self, dst: &mut BytesMut) {
        self.write_with_flags(dst, self.flags);
    }

    /// Writes this frame to the given buffer, substituting `flags` on the wire.
    pub fn write_with_flags(&self, dst: &mut BytesMut, flags: u16) {
        dst.reserve(self.wire_size());
        dst.put_i32_le(self.wire_size() as i32);
        dst.put_u16_le(flags);
        dst.put_slice(&self.content);
    }

    /// Reads a frame from the given buffer.
    ///
    /// Returns `Ok(None)` if there isn't enough data to read a complete frame;
    /// the buffer is left untouched in that case. A length field smaller than
    /// the frame header is a protocol violation.
    pub fn read_from(src: &mut BytesMut) -> Result<Option<Self>> {
        if src.len() < FRAME_HEADER_SIZE {
            return Ok(None);
        }

        let frame_length = Self::peek_length(src)?;
        if src.len() < frame_length {
            return Ok(None);
        }

        src.advance(SIZE_OF_FRAME_LENGTH_FIELD);
        let flags = src.get_u16_le();
        let content = src.split_to(frame_length - FRAME_HEADER_SIZE);

        Ok(Some(Self::new(content, flags)))
    }

    /// Reads and validates the length field at the start of `src`.
    pub(crate) fn peek_length(src: &[u8]) -> Result<usize> {
        let raw = i32::from_le_bytes([src[0], src[1], src[2], src[3]]);
        match usize::try_from(raw) {
            Ok(length) if length >= FRAME_HEADER_SIZE => Ok(length),
            _ => Err(HazelcastError::Protocol(format!(
                "invalid frame length {}",
                raw
            ))),
        }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::with_flags(DEFAULT_FLAGS)
    }
}
