use std::fmt;

use super::{begin_structure, end_structure, open_structure};
use crate::error::Result;
use crate::protocol::builtin::{CodecUtil, StringCodec};
use crate::protocol::client_message::{ClientMessage, FrameCursor};
use crate::protocol::fields::FieldWriter;

/// A member's network address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    /// Host name or IP literal.
    pub host: String,
    /// TCP port.
    pub port: i32,
}

impl Address {
    /// Creates an address.
    pub fn new(host: impl Into<String>, port: i32) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Codec for [`Address`].
pub struct AddressCodec;

impl AddressCodec {
    /// Encodes `address` as a data structure.
    pub fn encode(msg: &mut ClientMessage, address: &Address) {
        begin_structure(msg, FieldWriter::new().int(address.port));
        StringCodec::encode(msg, &address.host);
        end_structure(msg);
    }

    /// Decodes an address.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<Address> {
        let mut fields = open_structure(cursor)?;
        let port = fields.int()?;
        let host = StringCodec::decode(cursor)?;
        CodecUtil::fast_forward_to_end_frame(cursor)?;
        Ok(Address { host, port })
    }

    /// Decodes an address or a null frame.
    pub fn decode_nullable(cursor: &mut FrameCursor<'_>) -> Result<Option<Address>> {
        CodecUtil::decode_nullable(cursor, Self::decode)
    }
}

#[cfg(test)]
mod tests {
    use super::super::roundtrip;
    use super::*;
    use crate::protocol::frame::Frame;

    #[test]
    fn test_address_layout() {
        let mut msg = ClientMessage::new();
        AddressCodec::encode(&mut msg, &Address::new("10.0.0.1", 5701));

        let frames = msg.frames();
        assert_eq!(frames.len(), 4);
        assert!(frames[0].is_begin_frame());
        assert_eq!(&frames[1].content[..], &[0x45, 0x16, 0, 0]);
        assert_eq!(&frames[2].content[..], b"10.0.0.1");
        assert!(frames[3].is_end_frame());
    }

    #[test]
    fn test_address_roundtrip_and_display() {
        let address = Address::new("localhost", 5702);
        let decoded = roundtrip(&address, AddressCodec::encode, AddressCodec::decode);
        assert_eq!(decoded, address);
        assert_eq!(decoded.to_string(), "localhost:5702");
    }

    #[test]
    fn test_trailing_fields_are_skipped() {
        let mut msg = ClientMessage::new();
        begin_structure(&mut msg, FieldWriter::new().int(1).long(99));
        StringCodec::encode(&mut msg, "host");
        StringCodec::encode(&mut msg, "field from a newer member");
        msg.add_frame(Frame::new_begin_frame());
        msg.add_frame(Frame::new_end_frame());
        end_structure(&mut msg);

        let mut cursor = msg.cursor();
        assert_eq!(AddressCodec::decode(&mut cursor).unwrap(), Address::new("host", 1));
        assert!(!cursor.has_next());
    }
}
