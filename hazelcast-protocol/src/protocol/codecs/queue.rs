use super::{operation, RequestBuilder, ResponseReader};
use crate::error::Result;
use crate::protocol::builtin::{DataCodec, StringCodec};
use crate::protocol::client_message::ClientMessage;
use crate::serialization::Data;

operation!(
    /// Inserts an item, waiting up to a timeout for space.
    QueueOfferCodec,
    "Queue.Offer",
    0x030100,
    retryable = false
);

impl QueueOfferCodec {
    /// Encodes the request.
    pub fn encode_request(name: &str, value: &Data, timeout_millis: i64) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().long(timeout_millis).build();
        StringCodec::encode(&mut msg, name);
        DataCodec::encode(&mut msg, value);
        msg
    }

    /// Decodes whether the item was added.
    pub fn decode_response(msg: &ClientMessage) -> Result<bool> {
        ResponseReader::response(msg)?.fields.boolean()
    }
}

operation!(
    /// Takes the head item, waiting up to a timeout for one.
    QueuePollCodec,
    "Queue.Poll",
    0x030500,
    retryable = false
);

impl QueuePollCodec {
    /// Encodes the request.
    pub fn encode_request(name: &str, timeout_millis: i64) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().long(timeout_millis).build();
        StringCodec::encode(&mut msg, name);
        msg
    }

    /// Decodes the item, if one arrived in time.
    pub fn decode_response(msg: &ClientMessage) -> Result<Option<Data>> {
        let mut reader = ResponseReader::response(msg)?;
        DataCodec::decode_nullable(&mut reader.frames)
    }
}

operation!(
    /// Returns the number of queued items.
    QueueSizeCodec,
    "Queue.Size",
    0x030300,
    retryable = false
);

impl QueueSizeCodec {
    /// Encodes the request.
    pub fn encode_request(name: &str) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().build();
        StringCodec::encode(&mut msg, name);
        msg
    }

    /// Decodes the size.
    pub fn decode_response(msg: &ClientMessage) -> Result<i32> {
        ResponseReader::response(msg)?.fields.int()
    }
}
