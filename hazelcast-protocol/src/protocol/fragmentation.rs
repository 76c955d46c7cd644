//! Reassembly of logical messages from physical fragments.

use std::collections::HashMap;

use bytes::BytesMut;

use super::client_message::ClientMessage;
use super::constants::*;
use super::reader::{ClientMessageReader, ReaderConfig};
use crate::error::{HazelcastError, Result};

/// Reassembles fragmented messages, keyed by fragmentation id.
///
/// Owned by a single inbound read path; it does no locking of its own.
#[derive(Debug, Default)]
pub struct FragmentAssembler {
    in_progress: HashMap<i64, ClientMessage>,
}

impl FragmentAssembler {
    /// Creates an assembler with no messages in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one physical message.
    ///
    /// Returns the logical message once it is complete: immediately for an
    /// unfragmented message, or on the end fragment otherwise. A middle or end
    /// fragment for an unknown fragmentation id is a protocol violation.
    pub fn accept(&mut self, message: ClientMessage) -> Result<Option<ClientMessage>> {
        let flags = message.header_flags()?;
        if flags & UNFRAGMENTED_MESSAGE == UNFRAGMENTED_MESSAGE {
            return Ok(Some(message));
        }

        let fragmentation_id = message.fragmentation_id()?;

        if flags & BEGIN_FRAGMENT_FLAG != 0 {
            let logical = ClientMessage::from_frames(message.into_frames().split_off(1));
            tracing::debug!(
                fragmentation_id,
                frames = logical.frame_count(),
                "started fragmented message"
            );
            if self.in_progress.insert(fragmentation_id, logical).is_some() {
                tracing::warn!(fragmentation_id, "begin fragment replaced an unfinished message");
            }
            return Ok(None);
        }

        let existing = self.in_progress.get_mut(&fragmentation_id).ok_or_else(|| {
            tracing::warn!(fragmentation_id, "fragment for unknown fragmentation id");
            HazelcastError::Protocol(format!(
                "fragment for unknown fragmentation id {}",
                fragmentation_id
            ))
        })?;
        existing.merge(message);

        if flags & END_FRAGMENT_FLAG != 0 {
            let complete = self.in_progress.remove(&fragmentation_id);
            if let Some(ref msg) = complete {
                tracing::debug!(
                    fragmentation_id,
                    frames = msg.frame_count(),
                    "completed fragmented message"
                );
            }
            return Ok(complete);
        }

        Ok(None)
    }

    /// Returns the number of fragmented messages still being assembled.
    pub fn in_progress(&self) -> usize {
        self.in_progress.len()
    }
}

/// Drives a reader and an assembler over a connection's inbound buffer and
/// hands each completed logical message to a callback.
pub struct ClientMessageDecoder<F>
where
    F: FnMut(ClientMessage),
{
    reader: ClientMessageReader,
    assembler: FragmentAssembler,
    on_message: F,
}

impl<F> ClientMessageDecoder<F>
where
    F: FnMut(ClientMessage),
{
    /// Creates a decoder with default reader limits.
    pub fn new(on_message: F) -> Self {
        Self::with_config(ReaderConfig::default(), on_message)
    }

    /// Creates a decoder with the given reader limits.
    pub fn with_config(config: ReaderConfig, on_message: F) -> Self {
        Self {
            reader: ClientMessageReader::with_config(config),
            assembler: FragmentAssembler::new(),
            on_message,
        }
    }

    /// Processes every complete message currently in `buf`.
    ///
    /// An error leaves the decoder in an undefined state; the connection
    /// should be closed.
    pub fn on_read(&mut self, buf: &mut BytesMut) -> Result<()> {
        while let Some(physical) = self.reader.read(buf)? {
            if let Some(logical) = self.assembler.accept(physical)? {
                (self.on_message)(logical);
            }
        }
        Ok(())
    }
}

impl<F> std::fmt::Debug for ClientMessageDecoder<F>
where
    F: FnMut(ClientMessage),
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientMessageDecoder")
            .field("reader", &self.reader)
            .field("assembler", &self.assembler)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::fixed_size;
    use crate::protocol::writer::encode_message;
    use crate::protocol::Frame;

    fn fragment(flags: u16, id: i64, payload: &[u8]) -> ClientMessage {
        let mut header = Frame::zeroed(LONG_SIZE_IN_BYTES, flags);
        fixed_size::encode_long(&mut header.content, FRAGMENTATION_ID_OFFSET, id);
        ClientMessage::from_frames(vec![header, Frame::from_slice(payload)])
    }

    #[test]
    fn test_unfragmented_passes_through() {
        let mut assembler = FragmentAssembler::new();
        let msg =
            ClientMessage::from_frame(Frame::zeroed(REQUEST_HEADER_SIZE, UNFRAGMENTED_MESSAGE));

        let out = assembler.accept(msg.clone()).unwrap();
        assert_eq!(out, Some(msg));
        assert_eq!(assembler.in_progress(), 0);
    }

    #[test]
    fn test_begin_middle_end() {
        let mut assembler = FragmentAssembler::new();

        assert!(assembler.accept(fragment(BEGIN_FRAGMENT_FLAG, 5, b"a")).unwrap().is_none());
        assert_eq!(assembler.in_progress(), 1);
        assert!(assembler.accept(fragment(DEFAULT_FLAGS, 5, b"b")).unwrap().is_none());
        let msg = assembler.accept(fragment(END_FRAGMENT_FLAG, 5, b"c")).unwrap().unwrap();

        let contents: Vec<&[u8]> = msg.frames().iter().map(|f| &f.content[..]).collect();
        assert_eq!(contents, vec![&b"a"[..], &b"b"[..], &b"c"[..]]);
        assert_eq!(assembler.in_progress(), 0);
    }

    #[test]
    fn test_interleaved_fragmentation_ids() {
        let mut assembler = FragmentAssembler::new();
        assembler.accept(fragment(BEGIN_FRAGMENT_FLAG, 1, b"x1")).unwrap();
        assembler.accept(fragment(BEGIN_FRAGMENT_FLAG, 2, b"y1")).unwrap();

        let second = assembler.accept(fragment(END_FRAGMENT_FLAG, 2, b"y2")).unwrap().unwrap();
        assert_eq!(&second.frames()[1].content[..], b"y2");
        assert_eq!(assembler.in_progress(), 1);

        let first = assembler.accept(fragment(END_FRAGMENT_FLAG, 1, b"x2")).unwrap().unwrap();
        assert_eq!(&first.frames()[0].content[..], b"x1");
    }

    #[test]
    fn test_unknown_fragmentation_id_is_protocol_error() {
        let mut assembler = FragmentAssembler::new();
        let result = assembler.accept(fragment(END_FRAGMENT_FLAG, 77, b"c"));
        assert!(matches!(result, Err(HazelcastError::Protocol(_))));

        let result = assembler.accept(fragment(DEFAULT_FLAGS, 78, b"b"));
        assert!(result.is_err());
    }

    #[test]
    fn test_decoder_invokes_callback_once_per_logical_message() {
        let mut delivered = Vec::new();
        let mut buf = BytesMut::new();
        for (flags, payload) in [
            (BEGIN_FRAGMENT_FLAG, &b"a"[..]),
            (DEFAULT_FLAGS, &b"b"[..]),
            (END_FRAGMENT_FLAG, &b"c"[..]),
        ] {
            buf.extend_from_slice(&encode_message(&fragment(flags, 9, payload)));
        }

        {
            let mut decoder = ClientMessageDecoder::new(|msg| delivered.push(msg));
            decoder.on_read(&mut buf).unwrap();
        }

        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].frame_count(), 3);
        assert!(buf.is_empty());
    }
}
