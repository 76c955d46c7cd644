use super::{begin_structure, end_structure, open_structure};
use crate::error::Result;
use crate::protocol::builtin::{CodecUtil, DataCodec};
use crate::protocol::client_message::{ClientMessage, FrameCursor};
use crate::protocol::fields::FieldWriter;
use crate::serialization::Data;

/// A map entry together with its statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleEntryView {
    /// Serialized key.
    pub key: Data,
    /// Serialized value.
    pub value: Data,
    /// Memory cost in bytes.
    pub cost: i64,
    /// Creation time, epoch millis.
    pub creation_time: i64,
    /// Expiration time, epoch millis.
    pub expiration_time: i64,
    /// Number of hits.
    pub hits: i64,
    /// Last access time, epoch millis.
    pub last_access_time: i64,
    /// Last time the entry was written to the map store, epoch millis.
    pub last_stored_time: i64,
    /// Last update time, epoch millis.
    pub last_update_time: i64,
    /// Entry version.
    pub version: i64,
    /// Time to live, millis.
    pub ttl: i64,
    /// Maximum idle time, millis.
    pub max_idle: i64,
}

/// Codec for [`SimpleEntryView`].
pub struct SimpleEntryViewCodec;

impl SimpleEntryViewCodec {
    /// Encodes `view`.
    pub fn encode(msg: &mut ClientMessage, view: &SimpleEntryView) {
        begin_structure(
            msg,
            FieldWriter::new()
                .long(view.cost)
                .long(view.creation_time)
                .long(view.expiration_time)
                .long(view.hits)
                .long(view.last_access_time)
                .long(view.last_stored_time)
                .long(view.last_update_time)
                .long(view.version)
                .long(view.ttl)
                .long(view.max_idle),
        );
        DataCodec::encode(msg, &view.key);
        DataCodec::encode(msg, &view.value);
        end_structure(msg);
    }

    /// Decodes an entry view.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<SimpleEntryView> {
        let mut fields = open_structure(cursor)?;
        let cost = fields.long()?;
        let creation_time = fields.long()?;
        let expiration_time = fields.long()?;
        let hits = fields.long()?;
        let last_access_time = fields.long()?;
        let last_stored_time = fields.long()?;
        let last_update_time = fields.long()?;
        let version = fields.long()?;
        let ttl = fields.long()?;
        let max_idle = fields.long()?;
        let key = DataCodec::decode(cursor)?;
        let value = DataCodec::decode(cursor)?;
        CodecUtil::fast_forward_to_end_frame(cursor)?;
        Ok(SimpleEntryView {
            key,
            value,
            cost,
            creation_time,
            expiration_time,
            hits,
            last_access_time,
            last_stored_time,
            last_update_time,
            version,
            ttl,
            max_idle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::roundtrip;
    use super::*;
    use crate::serialization::ToData;

    #[test]
    fn test_entry_view_roundtrip() {
        let view = SimpleEntryView {
            key: "k".to_data().unwrap(),
            value: 7i32.to_data().unwrap(),
            cost: 1,
            creation_time: 2,
            expiration_time: 3,
            hits: 4,
            last_access_time: 5,
            last_stored_time: 6,
            last_update_time: 7,
            version: 8,
            ttl: 9,
            max_idle: 10,
        };
        let mut msg = ClientMessage::new();
        SimpleEntryViewCodec::encode(&mut msg, &view);
        assert_eq!(msg.frames()[1].content.len(), 80);

        assert_eq!(
            roundtrip(&view, SimpleEntryViewCodec::encode, SimpleEntryViewCodec::decode),
            view
        );
    }
}
