use super::{operation, RequestBuilder, ResponseReader};
use crate::error::Result;
use crate::protocol::builtin::{DataCodec, ListMultiFrameCodec, StringCodec};
use crate::protocol::client_message::ClientMessage;
use crate::serialization::Data;

operation!(
    /// Appends items to a list.
    ListAddAllCodec,
    "List.AddAll",
    0x050600,
    retryable = false
);

impl ListAddAllCodec {
    /// Encodes the request.
    pub fn encode_request(name: &str, values: &[Data]) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().build();
        StringCodec::encode(&mut msg, name);
        ListMultiFrameCodec::encode(&mut msg, values, DataCodec::encode);
        msg
    }

    /// Decodes whether the list changed.
    pub fn decode_response(msg: &ClientMessage) -> Result<bool> {
        ResponseReader::response(msg)?.fields.boolean()
    }
}

operation!(
    /// Reads the item at an index.
    ListGetCodec,
    "List.Get",
    0x050F00,
    retryable = true
);

impl ListGetCodec {
    /// Encodes the request.
    pub fn encode_request(name: &str, index: i32) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().int(index).build();
        StringCodec::encode(&mut msg, name);
        msg
    }

    /// Decodes the item.
    pub fn decode_response(msg: &ClientMessage) -> Result<Option<Data>> {
        let mut reader = ResponseReader::response(msg)?;
        DataCodec::decode_nullable(&mut reader.frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::codecs::{Operation, ResponseBuilder};
    use crate::serialization::ToData;

    #[test]
    fn test_add_all() {
        let values = vec![1i32.to_data().unwrap(), 2i32.to_data().unwrap()];
        let msg = ListAddAllCodec::encode_request("l", &values);
        let mut cursor = msg.cursor();
        cursor.next().unwrap();
        assert_eq!(StringCodec::decode(&mut cursor).unwrap(), "l");
        assert_eq!(ListMultiFrameCodec::decode(&mut cursor, DataCodec::decode).unwrap(), values);

        let response = ResponseBuilder::response(ListAddAllCodec::RESPONSE_TYPE)

            .boolean(true)

            .build();
        assert!(ListAddAllCodec::decode_response(&response).unwrap());
    }

    #[test]
    fn test_get() {
        let item = "x".to_data().unwrap();
        let mut response = ResponseBuilder::response(ListGetCodec::RESPONSE_TYPE).build();
        DataCodec::encode(&mut response, &item);
        assert_eq!(ListGetCodec::decode_response(&response).unwrap(), Some(item));
        assert!(ListGetCodec::encode_request("l", 0).is_retryable());
    }
}
