//! Codec implementation for encoding/decoding Hazelcast protocol messages.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use super::client_message::ClientMessage;
use super::fragmentation::FragmentAssembler;
use super::reader::{ClientMessageReader, ReaderConfig};
use super::writer::write_message;
use crate::error::{HazelcastError, Result};

/// Codec for encoding and decoding Hazelcast client messages.
///
/// Implements the `tokio_util::codec::{Encoder, Decoder}` traits for use
/// with tokio's framed I/O. Decoding yields logical messages: fragments are
/// reassembled before they are returned.
#[derive(Debug, Default)]
pub struct ClientMessageCodec {
    reader: ClientMessageReader,
    assembler: FragmentAssembler,
}

impl ClientMessageCodec {
    /// Creates a new codec instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a codec with the given reader limits.
    pub fn with_config(config: ReaderConfig) -> Self {
        Self {
            reader: ClientMessageReader::with_config(config),
            assembler: FragmentAssembler::new(),
        }
    }
}

impl Encoder<&ClientMessage> for ClientMessageCodec {
    type Error = HazelcastError;

    fn encode(&mut self, item: &ClientMessage, dst: &mut BytesMut) -> Result<()> {
        if item.is_empty() {
            return Err(HazelcastError::Protocol(
                "cannot encode empty message".to_string(),
            ));
        }

        write_message(item, dst);
        Ok(())
    }
}

impl Encoder<ClientMessage> for ClientMessageCodec {
    type Error = HazelcastError;

    fn encode(&mut self, item: ClientMessage, dst: &mut BytesMut) -> Result<()> {
        Encoder::<&ClientMessage>::encode(self, &item, dst)
    }
}

impl Decoder for ClientMessageCodec {
    type Item = ClientMessage;
    type Error = HazelcastError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        while let Some(physical) = self.reader.read(src)? {
            if let Some(logical) = self.assembler.accept(physical)? {
                return Ok(Some(logical));
            }
        }
        Ok(None)
    }
}
