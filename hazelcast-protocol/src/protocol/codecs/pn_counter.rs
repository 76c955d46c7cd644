use uuid::Uuid;

use super::{operation, RequestBuilder, ResponseReader};
use crate::error::Result;
use crate::protocol::builtin::{EntryListUUIDLongCodec, StringCodec};
use crate::protocol::client_message::ClientMessage;

/// Value of a PN counter together with the replica state the client must
/// send back on its next call for session consistency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PNCounterResponse {
    /// Counter value.
    pub value: i64,
    /// Vector clock observed by the replica, keyed by replica UUID.
    pub replica_timestamps: Vec<(Uuid, i64)>,
    /// Number of replicas the counter is configured with.
    pub replica_count: i32,
}

fn decode_counter(msg: &ClientMessage) -> Result<PNCounterResponse> {
    let mut reader = ResponseReader::response(msg)?;
    let value = reader.fields.long()?;
    let replica_count = reader.fields.int()?;
    let replica_timestamps = EntryListUUIDLongCodec::decode(&mut reader.frames)?;
    Ok(PNCounterResponse {
        value,
        replica_timestamps,
        replica_count,
    })
}

operation!(
    /// Reads a PN counter from a replica.
    PNCounterGetCodec,
    "PNCounter.Get",
    0x1D0100,
    retryable = true
);

impl PNCounterGetCodec {
    /// Encodes the request.
    pub fn encode_request(
        name: &str,
        replica_timestamps: &[(Uuid, i64)],
        target_replica: Uuid,
    ) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>()
            .uuid(Some(target_replica))
            .build();
        StringCodec::encode(&mut msg, name);
        EntryListUUIDLongCodec::encode(&mut msg, replica_timestamps);
        msg
    }

    /// Decodes the counter state.
    pub fn decode_response(msg: &ClientMessage) -> Result<PNCounterResponse> {
        decode_counter(msg)
    }
}

operation!(
    /// Adds a delta to a PN counter on a replica.
    PNCounterAddCodec,
    "PNCounter.Add",
    0x1D0200,
    retryable = false
);

impl PNCounterAddCodec {
    /// Encodes the request. With `get_before_update` set, the response
    /// carries the value before the delta was applied.
    pub fn encode_request(
        name: &str,
        delta: i64,
        get_before_update: bool,
        replica_timestamps: &[(Uuid, i64)],
        target_replica: Uuid,
    ) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>()
            .long(delta)
            .boolean(get_before_update)
            .uuid(Some(target_replica))
            .build();
        StringCodec::encode(&mut msg, name);
        EntryListUUIDLongCodec::encode(&mut msg, replica_timestamps);
        msg
    }

    /// Decodes the counter state.
    pub fn decode_response(msg: &ClientMessage) -> Result<PNCounterResponse> {
        decode_counter(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::codecs::{Operation, ResponseBuilder};
    use crate::protocol::constants::REQUEST_HEADER_SIZE;
    use crate::protocol::fixed_size;

    #[test]
    fn test_add_request_layout() {
        let replica = Uuid::from_u128(4);
        let timestamps = vec![(Uuid::from_u128(1), 10), (Uuid::from_u128(2), 20)];
        let msg = PNCounterAddCodec::encode_request("c", -5, true, &timestamps, replica);
        let initial = msg.initial_frame().unwrap();
        assert_eq!(initial.content.len(), REQUEST_HEADER_SIZE + 8 + 1 + 17);
        assert_eq!(fixed_size::decode_long(&initial.content, REQUEST_HEADER_SIZE).unwrap(), -5);
        assert_eq!(
            fixed_size::decode_uuid(&initial.content, REQUEST_HEADER_SIZE + 9).unwrap(),
            Some(replica)
        );

        let mut cursor = msg.cursor();
        cursor.next().unwrap();
        assert_eq!(StringCodec::decode(&mut cursor).unwrap(), "c");
        assert_eq!(EntryListUUIDLongCodec::decode(&mut cursor).unwrap(), timestamps);
    }

    #[test]
    fn test_get_response() {
        let timestamps = vec![(Uuid::from_u128(1), 11)];
        let mut response = ResponseBuilder::response(PNCounterGetCodec::RESPONSE_TYPE)
            .long(99)
            .int(3)
            .build();
        EntryListUUIDLongCodec::encode(&mut response, &timestamps);

        let decoded = PNCounterGetCodec::decode_response(&response).unwrap();
        assert_eq!(
            decoded,
            PNCounterResponse {
                value: 99,
                replica_timestamps: timestamps,
                replica_count: 3,
            }
        );
    }
}
