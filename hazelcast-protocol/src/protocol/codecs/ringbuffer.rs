use super::{operation, RequestBuilder, ResponseReader};
use crate::error::Result;
use crate::protocol::builtin::{DataCodec, ListMultiFrameCodec, LongArrayCodec, StringCodec};
use crate::protocol::client_message::ClientMessage;
use crate::serialization::Data;

operation!(
    /// Returns the number of items in a ringbuffer.
    RingbufferSizeCodec,
    "Ringbuffer.Size",
    0x170100,
    retryable = true
);

impl RingbufferSizeCodec {
    /// Encodes the request.
    pub fn encode_request(name: &str) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().build();
        StringCodec::encode(&mut msg, name);
        msg
    }

    /// Decodes the size.
    pub fn decode_response(msg: &ClientMessage) -> Result<i64> {
        ResponseReader::response(msg)?.fields.long()
    }
}

operation!(
    /// Reads a range of items starting at a sequence.
    RingbufferReadManyCodec,
    "Ringbuffer.ReadMany",
    0x170900,
    retryable = true
);

/// Items read from a ringbuffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadManyResponse {
    /// Number of items read, including items the filter dropped.
    pub read_count: i32,
    /// Items that passed the filter.
    pub items: Vec<Data>,
    /// Sequence of each returned item, when the member reports them.
    pub item_seqs: Option<Vec<i64>>,
    /// Sequence to read from next.
    pub next_seq: i64,
}

impl RingbufferReadManyCodec {
    /// Encodes the request. The member blocks until `min_count` items are
    /// available and returns at most `max_count`.
    pub fn encode_request(
        name: &str,
        start_sequence: i64,
        min_count: i32,
        max_count: i32,
        filter: Option<&Data>,
    ) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>()
            .long(start_sequence)
            .int(min_count)
            .int(max_count)
            .build();
        StringCodec::encode(&mut msg, name);
        DataCodec::encode_nullable(&mut msg, filter);
        msg
    }

    /// Decodes the items.
    pub fn decode_response(msg: &ClientMessage) -> Result<ReadManyResponse> {
        let mut reader = ResponseReader::response(msg)?;
        let read_count = reader.fields.int()?;
        let next_seq = reader.fields.long()?;
        let items = ListMultiFrameCodec::decode(&mut reader.frames, DataCodec::decode)?;
        let item_seqs = LongArrayCodec::decode_nullable(&mut reader.frames)?;
        Ok(ReadManyResponse {
            read_count,
            items,
            item_seqs,
            next_seq,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::codecs::{Operation, ResponseBuilder};
    use crate::protocol::constants::REQUEST_HEADER_SIZE;
    use crate::protocol::fixed_size;
    use crate::protocol::frame::Frame;
    use crate::serialization::ToData;

    #[test]
    fn test_read_many_request_without_filter() {
        let msg = RingbufferReadManyCodec::encode_request("rb", 40, 1, 10, None);
        let initial = msg.initial_frame().unwrap();
        assert_eq!(initial.content.len(), REQUEST_HEADER_SIZE + 16);
        assert_eq!(fixed_size::decode_int(&initial.content, REQUEST_HEADER_SIZE + 12).unwrap(), 10);
        assert!(msg.frames()[2].is_null_frame());
    }

    #[test]
    fn test_read_many_response() {
        let items = vec!["a".to_data().unwrap(), "b".to_data().unwrap()];
        let mut response = ResponseBuilder::response(RingbufferReadManyCodec::RESPONSE_TYPE)
            .int(3)
            .long(43)
            .build();
        ListMultiFrameCodec::encode(&mut response, &items, DataCodec::encode);
        LongArrayCodec::encode(&mut response, &[40, 42]);

        let decoded = RingbufferReadManyCodec::decode_response(&response).unwrap();
        assert_eq!(decoded.read_count, 3);
        assert_eq!(decoded.next_seq, 43);
        assert_eq!(decoded.items, items);
        assert_eq!(decoded.item_seqs, Some(vec![40, 42]));
    }

    #[test]
    fn test_read_many_response_without_sequences() {
        let mut response = ResponseBuilder::response(RingbufferReadManyCodec::RESPONSE_TYPE)
            .int(0)
            .long(0)
            .build();
        ListMultiFrameCodec::encode(&mut response, Vec::<&Data>::new(), DataCodec::encode);
        response.add_frame(Frame::new_null_frame());

        let decoded = RingbufferReadManyCodec::decode_response(&response).unwrap();
        assert!(decoded.items.is_empty());
        assert_eq!(decoded.item_seqs, None);
    }

    #[test]
    fn test_size() {
        let response = ResponseBuilder::response(RingbufferSizeCodec::RESPONSE_TYPE)
            .long(12)
            .build();
        assert_eq!(RingbufferSizeCodec::decode_response(&response).unwrap(), 12);
    }
}
