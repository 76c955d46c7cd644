use crate::error::{HazelcastError, Result};
use crate::protocol::client_message::{ClientMessage, FrameCursor};
use crate::protocol::frame::Frame;

/// Helpers shared by every structured codec.
pub struct CodecUtil;

impl CodecUtil {
    /// Skips frames until the END frame matching an already consumed BEGIN
    /// frame, honouring nested structures.
    pub fn fast_forward_to_end_frame(cursor: &mut FrameCursor<'_>) -> Result<()> {
        let mut expected_end_frames = 1usize;
        while expected_end_frames != 0 {
            let frame = cursor.next()?;
            if frame.is_end_frame() {
                expected_end_frames -= 1;
            } else if frame.is_begin_frame() {
                expected_end_frames += 1;
            }
        }
        Ok(())
    }

    /// Writes a null frame for `None`, otherwise runs `encoder`.
    pub fn encode_nullable<T, F>(msg: &mut ClientMessage, value: Option<T>, encoder: F)
    where
        F: FnOnce(&mut ClientMessage, T),
    {
        match value {
            Some(value) => encoder(msg, value),
            None => msg.add_frame(Frame::new_null_frame()),
        }
    }

    /// Consumes a null frame and yields `None`, otherwise runs `decoder`.
    pub fn decode_nullable<'a, T, F>(cursor: &mut FrameCursor<'a>, decoder: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut FrameCursor<'a>) -> Result<T>,
    {
        if Self::next_frame_is_null_frame(cursor)? {
            Ok(None)
        } else {
            decoder(cursor).map(Some)
        }
    }

    /// Returns true if the next frame closes the current structure.
    pub fn next_frame_is_data_structure_end_frame(cursor: &FrameCursor<'_>) -> Result<bool> {
        Ok(Self::peek(cursor)?.is_end_frame())
    }

    /// Returns true if the next frame is a null frame, consuming it if so.
    pub fn next_frame_is_null_frame(cursor: &mut FrameCursor<'_>) -> Result<bool> {
        let is_null = Self::peek(cursor)?.is_null_frame();
        if is_null {
            cursor.next()?;
        }
        Ok(is_null)
    }

    fn peek<'a>(cursor: &FrameCursor<'a>) -> Result<&'a Frame> {
        cursor.peek_next().ok_or_else(|| {
            HazelcastError::Protocol(format!(
                "unexpected end of message after {} frames",
                cursor.position()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested(depth: usize, msg: &mut ClientMessage) {
        msg.add_frame(Frame::new_begin_frame());
        msg.add_frame(Frame::from_slice(&[depth as u8]));
        if depth > 0 {
            nested(depth - 1, msg);
        }
        msg.add_frame(Frame::new_end_frame());
    }

    #[test]
    fn test_fast_forward_skips_nested_structures() {
        let mut msg = ClientMessage::new();
        nested(3, &mut msg);
        msg.add_frame(Frame::from_slice(b"after"));

        let mut cursor = msg.cursor();
        cursor.next().unwrap();
        CodecUtil::fast_forward_to_end_frame(&mut cursor).unwrap();

        assert_eq!(&cursor.next().unwrap().content[..], b"after");
    }

    #[test]
    fn test_fast_forward_unbalanced_is_error() {
        let mut msg = ClientMessage::new();
        msg.add_frame(Frame::new_begin_frame());
        msg.add_frame(Frame::new_begin_frame());
        msg.add_frame(Frame::new_end_frame());

        let mut cursor = msg.cursor();
        cursor.next().unwrap();
        assert!(matches!(
            CodecUtil::fast_forward_to_end_frame(&mut cursor),
            Err(HazelcastError::Protocol(_))
        ));
    }

    #[test]
    fn test_nullable_roundtrip() {
        let mut msg = ClientMessage::new();
        CodecUtil::encode_nullable(&mut msg, None::<&[u8]>, |m, v| {
            m.add_frame(Frame::from_slice(v))
        });
        CodecUtil::encode_nullable(&mut msg, Some(&b"x"[..]), |m, v| {
            m.add_frame(Frame::from_slice(v))
        });

        let mut cursor = msg.cursor();
        let first =
            CodecUtil::decode_nullable(&mut cursor, |c| Ok(c.next()?.content.to_vec())).unwrap();
        let second =
            CodecUtil::decode_nullable(&mut cursor, |c| Ok(c.next()?.content.to_vec())).unwrap();

        assert_eq!(first, None);
        assert_eq!(second, Some(b"x".to_vec()));
        assert!(!cursor.has_next());
    }

    #[test]
    fn test_peek_past_end_is_error() {
        let msg = ClientMessage::new();
        let mut cursor = msg.cursor();
        assert!(CodecUtil::next_frame_is_null_frame(&mut cursor).is_err());
        assert!(CodecUtil::next_frame_is_data_structure_end_frame(&cursor).is_err());
    }
}
