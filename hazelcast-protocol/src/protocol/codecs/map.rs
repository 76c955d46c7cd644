use super::{operation, RequestBuilder, ResponseReader};
use crate::error::Result;
use crate::protocol::builtin::{
    CodecUtil, DataCodec, EntryListCodec, ListMultiFrameCodec, StringCodec,
};
use crate::protocol::client_message::ClientMessage;
use crate::protocol::custom::{
    AnchorDataListHolder, AnchorDataListHolderCodec, IndexConfig, IndexConfigCodec,
    PagingPredicateHolder, PagingPredicateHolderCodec, SimpleEntryView, SimpleEntryViewCodec,
};
use crate::serialization::Data;

/// One page of a paging predicate query, with the anchors the member
/// computed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedResponse<T> {
    /// Items of the page.
    pub items: Vec<T>,
    /// Anchors to send with the next page request.
    pub anchor_data_list: AnchorDataListHolder,
}

/// Response to [`MapGetEntryViewCodec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryViewResponse {
    /// The entry, if the key is mapped.
    pub entry_view: Option<SimpleEntryView>,
    /// Effective maximum idle time of the entry, millis.
    pub max_idle: i64,
}

fn decode_nullable_data(msg: &ClientMessage) -> Result<Option<Data>> {
    let mut reader = ResponseReader::response(msg)?;
    DataCodec::decode_nullable(&mut reader.frames)
}

fn decode_data_list(msg: &ClientMessage) -> Result<Vec<Data>> {
    let mut reader = ResponseReader::response(msg)?;
    ListMultiFrameCodec::decode(&mut reader.frames, DataCodec::decode)
}

fn decode_entry_list(msg: &ClientMessage) -> Result<Vec<(Data, Data)>> {
    let mut reader = ResponseReader::response(msg)?;
    EntryListCodec::decode(&mut reader.frames, DataCodec::decode, DataCodec::decode)
}

fn encode_paging_request(
    mut msg: ClientMessage,
    name: &str,
    predicate: &PagingPredicateHolder,
) -> ClientMessage {
    StringCodec::encode(&mut msg, name);
    PagingPredicateHolderCodec::encode(&mut msg, predicate);
    msg
}

operation!(
    /// Maps a key to a value, returning the previous value.
    MapPutCodec,
    "Map.Put",
    0x010100,
    retryable = false
);

impl MapPutCodec {
    /// Encodes the request. A `ttl` of -1 keeps the map's configured TTL.
    pub fn encode_request(
        name: &str,
        key: &Data,
        value: &Data,
        thread_id: i64,
        ttl: i64,
    ) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>()
            .long(thread_id)
            .long(ttl)
            .build();
        StringCodec::encode(&mut msg, name);
        DataCodec::encode(&mut msg, key);
        DataCodec::encode(&mut msg, value);
        msg
    }

    /// Decodes the previous value.
    pub fn decode_response(msg: &ClientMessage) -> Result<Option<Data>> {
        decode_nullable_data(msg)
    }
}

operation!(
    /// Reads the value of a key.
    MapGetCodec,
    "Map.Get",
    0x010200,
    retryable = true
);

impl MapGetCodec {
    /// Encodes the request.
    pub fn encode_request(name: &str, key: &Data, thread_id: i64) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().long(thread_id).build();
        StringCodec::encode(&mut msg, name);
        DataCodec::encode(&mut msg, key);
        msg
    }

    /// Decodes the value, if the key is mapped.
    pub fn decode_response(msg: &ClientMessage) -> Result<Option<Data>> {
        decode_nullable_data(msg)
    }
}

operation!(
    /// Removes a key, returning its value.
    MapRemoveCodec,
    "Map.Remove",
    0x010300,
    retryable = false
);

impl MapRemoveCodec {
    /// Encodes the request.
    pub fn encode_request(name: &str, key: &Data, thread_id: i64) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().long(thread_id).build();
        StringCodec::encode(&mut msg, name);
        DataCodec::encode(&mut msg, key);
        msg
    }

    /// Decodes the removed value.
    pub fn decode_response(msg: &ClientMessage) -> Result<Option<Data>> {
        decode_nullable_data(msg)
    }
}

operation!(
    /// Replaces the value of a key only if it is mapped.
    MapReplaceCodec,
    "Map.Replace",
    0x010400,
    retryable = false
);

impl MapReplaceCodec {
    /// Encodes the request.
    pub fn encode_request(name: &str, key: &Data, value: &Data, thread_id: i64) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().long(thread_id).build();
        StringCodec::encode(&mut msg, name);
        DataCodec::encode(&mut msg, key);
        DataCodec::encode(&mut msg, value);
        msg
    }

    /// Decodes the replaced value.
    pub fn decode_response(msg: &ClientMessage) -> Result<Option<Data>> {
        decode_nullable_data(msg)
    }
}

operation!(
    /// Checks whether a key is mapped.
    MapContainsKeyCodec,
    "Map.ContainsKey",
    0x010600,
    retryable = true
);

impl MapContainsKeyCodec {
    /// Encodes the request.
    pub fn encode_request(name: &str, key: &Data, thread_id: i64) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().long(thread_id).build();
        StringCodec::encode(&mut msg, name);
        DataCodec::encode(&mut msg, key);
        msg
    }

    /// Decodes the answer.
    pub fn decode_response(msg: &ClientMessage) -> Result<bool> {
        ResponseReader::response(msg)?.fields.boolean()
    }
}

operation!(
    /// Reads the entry view of a key.
    MapGetEntryViewCodec,
    "Map.GetEntryView",
    0x011D00,
    retryable = true
);

impl MapGetEntryViewCodec {
    /// Encodes the request.
    pub fn encode_request(name: &str, key: &Data, thread_id: i64) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().long(thread_id).build();
        StringCodec::encode(&mut msg, name);
        DataCodec::encode(&mut msg, key);
        msg
    }

    /// Decodes the entry view and its max idle time.
    pub fn decode_response(msg: &ClientMessage) -> Result<EntryViewResponse> {
        let mut reader = ResponseReader::response(msg)?;
        let max_idle = reader.fields.long()?;
        let entry_view =
            CodecUtil::decode_nullable(&mut reader.frames, SimpleEntryViewCodec::decode)?;
        Ok(EntryViewResponse { entry_view, max_idle })
    }
}

operation!(
    /// Returns the keys matching a predicate.
    MapKeySetWithPredicateCodec,
    "Map.KeySetWithPredicate",
    0x012600,
    retryable = true
);

impl MapKeySetWithPredicateCodec {
    /// Encodes the request.
    pub fn encode_request(name: &str, predicate: &Data) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().build();
        StringCodec::encode(&mut msg, name);
        DataCodec::encode(&mut msg, predicate);
        msg
    }

    /// Decodes the keys.
    pub fn decode_response(msg: &ClientMessage) -> Result<Vec<Data>> {
        decode_data_list(msg)
    }
}

operation!(
    /// Returns the values of entries matching a predicate.
    MapValuesWithPredicateCodec,
    "Map.ValuesWithPredicate",
    0x012700,
    retryable = true
);

impl MapValuesWithPredicateCodec {
    /// Encodes the request.
    pub fn encode_request(name: &str, predicate: &Data) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().build();
        StringCodec::encode(&mut msg, name);
        DataCodec::encode(&mut msg, predicate);
        msg
    }

    /// Decodes the values.
    pub fn decode_response(msg: &ClientMessage) -> Result<Vec<Data>> {
        decode_data_list(msg)
    }
}

operation!(
    /// Returns the entries matching a predicate.
    MapEntriesWithPredicateCodec,
    "Map.EntriesWithPredicate",
    0x012800,
    retryable = true
);

impl MapEntriesWithPredicateCodec {
    /// Encodes the request.
    pub fn encode_request(name: &str, predicate: &Data) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().build();
        StringCodec::encode(&mut msg, name);
        DataCodec::encode(&mut msg, predicate);
        msg
    }

    /// Decodes the entries.
    pub fn decode_response(msg: &ClientMessage) -> Result<Vec<(Data, Data)>> {
        decode_entry_list(msg)
    }
}

operation!(
    /// Adds an index to a map.
    MapAddIndexCodec,
    "Map.AddIndex",
    0x012900,
    retryable = false
);

impl MapAddIndexCodec {
    /// Encodes the request.
    pub fn encode_request(name: &str, index_config: &IndexConfig) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().build();
        StringCodec::encode(&mut msg, name);
        IndexConfigCodec::encode(&mut msg, index_config);
        msg
    }
}

operation!(
    /// Returns the number of entries.
    MapSizeCodec,
    "Map.Size",
    0x012A00,
    retryable = true
);

impl MapSizeCodec {
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

operation!(
    /// Checks whether the map has no entries.
    MapIsEmptyCodec,
    "Map.IsEmpty",
    0x012B00,
    retryable = true
);

impl MapIsEmptyCodec {
    /// Encodes the request.
    pub fn encode_request(name: &str) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().build();
        StringCodec::encode(&mut msg, name);
        msg
    }

    /// Decodes the answer.
    pub fn decode_response(msg: &ClientMessage) -> Result<bool> {
        ResponseReader::response(msg)?.fields.boolean()
    }
}

operation!(
    /// Returns one page of keys matching a paging predicate.
    MapKeySetWithPagingPredicateCodec,
    "Map.KeySetWithPagingPredicate",
    0x013400,
    retryable = true
);

impl MapKeySetWithPagingPredicateCodec {
    /// Encodes the request.
    pub fn encode_request(name: &str, predicate: &PagingPredicateHolder) -> ClientMessage {
        encode_paging_request(RequestBuilder::for_operation::<Self>().build(), name, predicate)
    }

    /// Decodes the page of keys.
    pub fn decode_response(msg: &ClientMessage) -> Result<PagedResponse<Data>> {
        let mut reader = ResponseReader::response(msg)?;
        let items = ListMultiFrameCodec::decode(&mut reader.frames, DataCodec::decode)?;
        let anchor_data_list = AnchorDataListHolderCodec::decode(&mut reader.frames)?;
        Ok(PagedResponse { items, anchor_data_list })
    }
}

operation!(
    /// Returns one page of values matching a paging predicate.
    MapValuesWithPagingPredicateCodec,
    "Map.ValuesWithPagingPredicate",
    0x013500,
    retryable = true
);

impl MapValuesWithPagingPredicateCodec {
    /// Encodes the request.
    pub fn encode_request(name: &str, predicate: &PagingPredicateHolder) -> ClientMessage {
        encode_paging_request(RequestBuilder::for_operation::<Self>().build(), name, predicate)
    }

    /// Decodes the page of values.
    pub fn decode_response(msg: &ClientMessage) -> Result<PagedResponse<Data>> {
        let mut reader = ResponseReader::response(msg)?;
        let items = ListMultiFrameCodec::decode(&mut reader.frames, DataCodec::decode)?;
        let anchor_data_list = AnchorDataListHolderCodec::decode(&mut reader.frames)?;
        Ok(PagedResponse { items, anchor_data_list })
    }
}

operation!(
    /// Returns one page of entries matching a paging predicate.
    MapEntriesWithPagingPredicateCodec,
    "Map.EntriesWithPagingPredicate",
    0x013600,
    retryable = true
);

impl MapEntriesWithPagingPredicateCodec {
    /// Encodes the request.
    pub fn encode_request(name: &str, predicate: &PagingPredicateHolder) -> ClientMessage {
        encode_paging_request(RequestBuilder::for_operation::<Self>().build(), name, predicate)
    }

    /// Decodes the page of entries.
    pub fn decode_response(msg: &ClientMessage) -> Result<PagedResponse<(Data, Data)>> {
        let mut reader = ResponseReader::response(msg)?;
        let items =
            EntryListCodec::decode(&mut reader.frames, DataCodec::decode, DataCodec::decode)?;
        let anchor_data_list = AnchorDataListHolderCodec::decode(&mut reader.frames)?;
        Ok(PagedResponse { items, anchor_data_list })
    }
}

operation!(
    /// Maps a key with explicit TTL and max idle time.
    MapSetWithMaxIdleCodec,
    "Map.SetWithMaxIdle",
    0x014700,
    retryable = false
);

impl MapSetWithMaxIdleCodec {
    /// Encodes the request.
    pub fn encode_request(
        name: &str,
        key: &Data,
        value: &Data,
        thread_id: i64,
        ttl: i64,
        max_idle: i64,
    ) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>()
            .long(thread_id)
            .long(ttl)
            .long(max_idle)
            .build();
        StringCodec::encode(&mut msg, name);
        DataCodec::encode(&mut msg, key);
        DataCodec::encode(&mut msg, value);
        msg
    }

    /// Decodes the previous value.
    pub fn decode_response(msg: &ClientMessage) -> Result<Option<Data>> {
        decode_nullable_data(msg)
    }
}
