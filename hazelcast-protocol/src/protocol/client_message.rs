//! ClientMessage type for multi-frame Hazelcast protocol messages.

use bytes::BytesMut;

use super::constants::*;
use super::fixed_size;
use super::frame::Frame;
use crate::error::{HazelcastError, Result};

/// A client message composed of one or more frames.
///
/// The first frame is the "initial frame" containing the message header
/// (type, correlation ID, and partition ID for requests and events or backup
/// acks for responses). Additional frames contain the message payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientMessage {
    frames: Vec<Frame>,
    retryable: bool,
    operation_name: &'static str,
}

impl ClientMessage {
    /// Creates a new empty client message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a message whose first frame is `initial_frame`.
    pub fn from_frame(initial_frame: Frame) -> Self {
        Self::from_frames(vec![initial_frame])
    }

    /// Creates a client message from received frames.
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            ..Self::default()
        }
    }

    /// Adds a frame to the end of the message.
    pub fn add_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Appends the frames of a physical fragment to this logical message.
    ///
    /// The first frame of `fragment` only carries the fragmentation id and is
    /// dropped. `IS_FINAL` is cleared on what was the last frame so that only
    /// the tail of the merged message carries it.
    pub fn merge(&mut self, fragment: ClientMessage) {
        if let Some(last) = self.frames.last_mut() {
            last.flags &= !IS_FINAL_FLAG;
        }
        self.frames.extend(fragment.frames.into_iter().skip(1));
    }

    /// Returns a cursor positioned before the first frame.
    pub fn cursor(&self) -> FrameCursor<'_> {
        FrameCursor::new(&self.frames)
    }

    /// Returns a reference to the initial (first) frame.
    pub fn initial_frame(&self) -> Result<&Frame> {
        self.frames
            .first()
            .ok_or_else(|| HazelcastError::Protocol("message has no frames".to_string()))
    }

    fn initial_frame_mut(&mut self) -> Result<&mut Frame> {
        self.frames
            .first_mut()
            .ok_or_else(|| HazelcastError::Protocol("message has no frames".to_string()))
    }

    /// Returns the message type from the initial frame.
    pub fn message_type(&self) -> Result<i32> {
        fixed_size::decode_int(&self.initial_frame()?.content, TYPE_FIELD_OFFSET)
    }

    /// Sets the message type in the initial frame.
    pub fn set_message_type(&mut self, message_type: i32) -> Result<()> {
        let frame = self.initial_frame_mut()?;
        Self::ensure_len(frame, TYPE_FIELD_OFFSET + INT_SIZE_IN_BYTES)?;
        fixed_size::encode_int(&mut frame.content, TYPE_FIELD_OFFSET, message_type);
        Ok(())
    }

    /// Returns the correlation ID from the initial frame.
    pub fn correlation_id(&self) -> Result<i64> {
        fixed_size::decode_long(&self.initial_frame()?.content, CORRELATION_ID_FIELD_OFFSET)
    }

    /// Sets the correlation ID in the initial frame.
    pub fn set_correlation_id(&mut self, correlation_id: i64) -> Result<()> {
        let frame = self.initial_frame_mut()?;
        Self::ensure_len(frame, CORRELATION_ID_FIELD_OFFSET + LONG_SIZE_IN_BYTES)?;
        fixed_size::encode_long(&mut frame.content, CORRELATION_ID_FIELD_OFFSET, correlation_id);
        Ok(())
    }

    /// Returns the partition ID from the initial frame of a request or event.
    pub fn partition_id(&self) -> Result<i32> {
        fixed_size::decode_int(&self.initial_frame()?.content, PARTITION_ID_FIELD_OFFSET)
    }

    /// Sets the partition ID in the initial frame of a request.
    pub fn set_partition_id(&mut self, partition_id: i32) -> Result<()> {
        let frame = self.initial_frame_mut()?;
        Self::ensure_len(frame, PARTITION_ID_FIELD_OFFSET + INT_SIZE_IN_BYTES)?;
        fixed_size::encode_int(&mut frame.content, PARTITION_ID_FIELD_OFFSET, partition_id);
        Ok(())
    }

    /// Returns the number of backup acks carried by a response.
    pub fn number_of_backup_acks(&self) -> Result<i8> {
        fixed_size::decode_byte(
            &self.initial_frame()?.content,
            RESPONSE_BACKUP_ACKS_FIELD_OFFSET,
        )
    }

    /// Returns the fragmentation id of a physical fragment.
    pub fn fragmentation_id(&self) -> Result<i64> {
        fixed_size::decode_long(&self.initial_frame()?.content, FRAGMENTATION_ID_OFFSET)
    }

    /// Returns the flags of the initial frame.
    pub fn header_flags(&self) -> Result<u16> {
        Ok(self.initial_frame()?.flags)
    }

    /// Returns true if the initial frame carries the EVENT flag.
    pub fn is_event(&self) -> bool {
        self.frames.first().map_or(false, Frame::is_event_frame)
    }

    /// Returns true if this message is a backup acknowledgement event.
    pub fn is_backup_event(&self) -> bool {
        self.frames.first().map_or(false, Frame::is_backup_event_frame)
    }

    /// Returns whether the invocation layer may retry this request.
    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    /// Marks the request as retryable or not.
    pub fn set_retryable(&mut self, retryable: bool) {
        self.retryable = retryable;
    }

    /// Returns the operation name, used for diagnostics only.
    pub fn operation_name(&self) -> &'static str {
        self.operation_name
    }

    /// Sets the operation name.
    pub fn set_operation_name(&mut self, name: &'static str) {
        self.operation_name = name;
    }

    /// Returns a reference to all frames.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Consumes the message and returns its frames.
    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    /// Returns the number of frames in the message.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if the message has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Calculates the total size of the message on the wire.
    pub fn wire_size(&self) -> usize {
        self.frames.iter().map(Frame::wire_size).sum()
    }

    /// Writes all frames to `dst`, marking the last one as final.
    pub fn write_to(&self, dst: &mut BytesMut) {
        super::writer::write_message(self, dst);
    }

    fn ensure_len(frame: &Frame, len: usize) -> Result<()> {
        if frame.content.len() < len {
            return Err(HazelcastError::Protocol(format!(
                "initial frame has {} bytes, header needs {}",
                frame.content.len(),
                len
            )));
        }
        Ok(())
    }
}

/// A forward-only cursor over the frames of a message.
///
/// Decoders advance it but never rewind; `peek_next` provides the one-frame
/// lookahead needed to test for null and end markers.
#[derive(Debug, Clone)]
pub struct FrameCursor<'a> {
    frames: &'a [Frame],
    position: usize,
}

impl<'a> FrameCursor<'a> {
    /// Creates a cursor over `frames`, positioned before the first one.
    pub fn new(frames: &'a [Frame]) -> Self {
        Self {
            frames,
            position: 0,
        }
    }

    /// Returns the next frame and advances past it.
    pub fn next(&mut self) -> Result<&'a Frame> {
        let frame = self.frames.get(self.position).ok_or_else(|| {
            HazelcastError::Protocol(format!(
                "unexpected end of message after {} frames",
                self.position
            ))
        })?;
        self.position += 1;
        Ok(frame)
    }

    /// Returns true if at least one frame remains.
    pub fn has_next(&self) -> bool {
        self.position < self.frames.len()
    }

    /// Returns the next frame without consuming it.
    pub fn peek_next(&self) -> Option<&'a Frame> {
        self.frames.get(self.position)
    }

    /// Returns the index of the next frame.
    pub fn position(&self) -> usize {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(message_type: i32, correlation_id: i64, partition_id: i32) -> Frame {
        let mut frame = Frame::zeroed(REQUEST_HEADER_SIZE, UNFRAGMENTED_MESSAGE);
        fixed_size::encode_int(&mut frame.content, TYPE_FIELD_OFFSET, message_type);
        fixed_size::encode_long(&mut frame.content, CORRELATION_ID_FIELD_OFFSET, correlation_id);
        fixed_size::encode_int(&mut frame.content, PARTITION_ID_FIELD_OFFSET, partition_id);
        frame
    }

    #[test]
    fn test_header_accessors() {
        let msg = ClientMessage::from_frame(header(0x010200, 7, 3));

        assert_eq!(msg.message_type().unwrap(), 0x010200);
        assert_eq!(msg.correlation_id().unwrap(), 7);
        assert_eq!(msg.partition_id().unwrap(), 3);
        assert_eq!(msg.header_flags().unwrap(), UNFRAGMENTED_MESSAGE);
    }

    #[test]
    fn test_set_header_fields() {
        let mut msg = ClientMessage::from_frame(header(0, 0, PARTITION_ID_ANY));
        msg.set_message_type(0x000100).unwrap();
        msg.set_correlation_id(42).unwrap();
        msg.set_partition_id(123).unwrap();

        assert_eq!(msg.message_type().unwrap(), 0x000100);
        assert_eq!(msg.correlation_id().unwrap(), 42);
        assert_eq!(msg.partition_id().unwrap(), 123);
    }

    #[test]
    fn test_response_backup_acks() {
        let mut frame = Frame::zeroed(RESPONSE_HEADER_SIZE, UNFRAGMENTED_MESSAGE);
        fixed_size::encode_byte(&mut frame.content, RESPONSE_BACKUP_ACKS_FIELD_OFFSET, 2);
        let msg = ClientMessage::from_frame(frame);
        assert_eq!(msg.number_of_backup_acks().unwrap(), 2);
    }

    #[test]
    fn test_short_header_is_protocol_error() {
        let msg = ClientMessage::from_frame(Frame::from_slice(&[0x01, 0x02]));
        assert!(matches!(msg.message_type(), Err(HazelcastError::Protocol(_))));
        assert!(msg.correlation_id().is_err());
        assert!(msg.partition_id().is_err());

        let mut msg = ClientMessage::from_frame(Frame::from_slice(&[0x01; 10]));
        assert!(msg.set_partition_id(42).is_err());
    }

    #[test]
    fn test_empty_message_header_is_protocol_error() {
        let msg = ClientMessage::new();
        assert!(msg.message_type().is_err());
        assert!(msg.initial_frame().is_err());
        assert!(!msg.is_event());
        assert_eq!(msg.wire_size(), 0);
    }

    #[test]
    fn test_add_frame_and_wire_size() {
        let mut msg = ClientMessage::from_frame(header(1, 1, 1));
        let initial_size = msg.wire_size();
        msg.add_frame(Frame::from_slice(b"key"));
        msg.add_frame(Frame::from_slice(b"value"));

        assert_eq!(msg.frame_count(), 3);
        assert_eq!(msg.wire_size(), initial_size + 9 + 11);
    }

    #[test]
    fn test_merge_skips_fragment_header() {
        let mut msg = ClientMessage::from_frame(Frame::from_slice(b"a"));
        let fragment = ClientMessage::from_frames(vec![
            Frame::zeroed(LONG_SIZE_IN_BYTES, DEFAULT_FLAGS),
            Frame::from_slice(b"b"),
            Frame::from_slice(b"c"),
        ]);

        msg.merge(fragment);

        let contents: Vec<&[u8]> = msg.frames().iter().map(|f| &f.content[..]).collect();
        assert_eq!(contents, vec![&b"a"[..], &b"b"[..], &b"c"[..]]);
    }

    #[test]
    fn test_cursor_walks_forward() {
        let msg = ClientMessage::from_frames(vec![
            Frame::from_slice(b"1"),
            Frame::new_null_frame(),
            Frame::new_end_frame(),
        ]);
        let mut cursor = msg.cursor();

        assert!(cursor.has_next());
        assert_eq!(&cursor.next().unwrap().content[..], b"1");
        assert!(cursor.peek_next().unwrap().is_null_frame());
        assert_eq!(cursor.position(), 1);
        cursor.next().unwrap();
        assert!(cursor.next().unwrap().is_end_frame());
        assert!(!cursor.has_next());
        assert!(cursor.peek_next().is_none());
        assert!(matches!(cursor.next(), Err(HazelcastError::Protocol(_))));
    }

    #[test]
    fn test_event_flags() {
        let msg =
            ClientMessage::from_frame(Frame::with_flags(IS_EVENT_FLAG | UNFRAGMENTED_MESSAGE));
        assert!(msg.is_event());
        assert!(!msg.is_backup_event());

        let backup = ClientMessage::from_frame(Frame::with_flags(BACKUP_EVENT_FLAG));
        assert!(backup.is_backup_event());
    }

    #[test]
    fn test_retryable_and_operation_name() {
        let mut msg = ClientMessage::new();
        assert!(!msg.is_retryable());
        assert_eq!(msg.operation_name(), "");

        msg.set_retryable(true);
        msg.set_operation_name("Map.Get");
        assert!(msg.is_retryable());
        assert_eq!(msg.operation_name(), "Map.Get");
    }

    #[test]
    fn test_fragmentation_id() {
        let mut frame = Frame::zeroed(LONG_SIZE_IN_BYTES, BEGIN_FRAGMENT_FLAG);
        fixed_size::encode_long(&mut frame.content, FRAGMENTATION_ID_OFFSET, 99);
        let msg = ClientMessage::from_frame(frame);
        assert_eq!(msg.fragmentation_id().unwrap(), 99);
    }
}
