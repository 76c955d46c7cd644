//! Serializes a message's frames into wire bytes.

use bytes::{Bytes, BytesMut};

use super::client_message::ClientMessage;
use super::constants::IS_FINAL_FLAG;

/// Writes every frame of `message` to `dst`.
///
/// `IS_FINAL` is OR-ed into the flags of the last frame only; the message
/// itself is left untouched.
pub fn write_message(message: &ClientMessage, dst: &mut BytesMut) {
    dst.reserve(message.wire_size());
    let last = message.frame_count().saturating_sub(1);
    for (index, frame) in message.frames().iter().enumerate() {
        let flags = if index == last {
            frame.flags | IS_FINAL_FLAG
        } else {
            frame.flags
        };
        frame.write_with_flags(dst, flags);
    }
}

/// Encodes `message` into a freshly allocated buffer.
pub fn encode_message(message: &ClientMessage) -> Bytes {
    let mut buf = BytesMut::with_capacity(message.wire_size());
    write_message(message, &mut buf);
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::constants::*;
    use crate::protocol::Frame;

    #[test]
    fn test_final_flag_only_on_last_frame() {
        let msg = ClientMessage::from_frames(vec![
            Frame::with_flags(UNFRAGMENTED_MESSAGE),
            Frame::from_slice(b"x"),
            Frame::new_end_frame(),
        ]);

        let bytes = encode_message(&msg);

        assert_eq!(
            &bytes[..],
            &[
                6, 0, 0, 0, 0x00, 0xC0, // initial
                7, 0, 0, 0, 0x00, 0x00, b'x', // data
                6, 0, 0, 0, 0x00, 0x28, // end | final
            ]
        );
        assert!(!msg.frames()[2].is_final_frame());
    }

    #[test]
    fn test_write_empty_message() {
        let msg = ClientMessage::new();
        let mut buf = BytesMut::new();
        write_message(&msg, &mut buf);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_encoded_length_matches_wire_size() {
        let msg = ClientMessage::from_frames(vec![
            Frame::zeroed(REQUEST_HEADER_SIZE, UNFRAGMENTED_MESSAGE),
            Frame::from_slice(&[1; 100]),
        ]);
        assert_eq!(encode_message(&msg).len(), msg.wire_size());
    }
}
