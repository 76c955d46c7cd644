use super::{begin_structure, end_structure, open_structure};
use crate::error::Result;
use crate::protocol::builtin::{CodecUtil, DataCodec, EntryListCodec, ListIntegerCodec};
use crate::protocol::client_message::{ClientMessage, FrameCursor};
use crate::protocol::fields::FieldWriter;
use crate::protocol::frame::Frame;
use crate::serialization::Data;

/// Anchors of a paging predicate: for each anchor, the page it ends and the
/// serialized key and value of its last entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnchorDataListHolder {
    /// Page number of every anchor.
    pub anchor_page_list: Vec<i32>,
    /// Key and value of every anchor, parallel to `anchor_page_list`.
    pub anchor_data_list: Vec<(Data, Data)>,
}

/// Codec for [`AnchorDataListHolder`]. The type has no fixed fields, so the
/// structure carries no initial frame.
pub struct AnchorDataListHolderCodec;

impl AnchorDataListHolderCodec {
    /// Encodes `holder`.
    pub fn encode(msg: &mut ClientMessage, holder: &AnchorDataListHolder) {
        msg.add_frame(Frame::new_begin_frame());
        ListIntegerCodec::encode(msg, &holder.anchor_page_list);
        EntryListCodec::encode(
            msg,
            holder.anchor_data_list.iter().map(|(k, v)| (k, v)),
            DataCodec::encode,
            DataCodec::encode,
        );
        end_structure(msg);
    }

    /// Decodes anchors.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<AnchorDataListHolder> {
        cursor.next()?;
        let anchor_page_list = ListIntegerCodec::decode(cursor)?;
        let anchor_data_list =
            EntryListCodec::decode(cursor, DataCodec::decode, DataCodec::decode)?;
        CodecUtil::fast_forward_to_end_frame(cursor)?;
        Ok(AnchorDataListHolder {
            anchor_page_list,
            anchor_data_list,
        })
    }
}

/// The wire form of a paging predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagingPredicateHolder {
    /// Anchors collected from earlier pages.
    pub anchor_data_list_holder: AnchorDataListHolder,
    /// Serialized inner predicate.
    pub predicate_data: Option<Data>,
    /// Serialized comparator.
    pub comparator_data: Option<Data>,
    /// Entries per page.
    pub page_size: i32,
    /// Requested page, zero-based.
    pub page: i32,
    /// 0 keys, 1 values, 2 entries.
    pub iteration_type_id: i8,
    /// Serialized partition key, for partition-scoped queries.
    pub partition_key_data: Option<Data>,
}

/// Codec for [`PagingPredicateHolder`].
pub struct PagingPredicateHolderCodec;

impl PagingPredicateHolderCodec {
    /// Encodes `holder`.
    pub fn encode(msg: &mut ClientMessage, holder: &PagingPredicateHolder) {
        begin_structure(
            msg,
            FieldWriter::new()
                .int(holder.page_size)
                .int(holder.page)
                .byte(holder.iteration_type_id),
        );
        AnchorDataListHolderCodec::encode(msg, &holder.anchor_data_list_holder);
        DataCodec::encode_nullable(msg, holder.predicate_data.as_ref());
        DataCodec::encode_nullable(msg, holder.comparator_data.as_ref());
        DataCodec::encode_nullable(msg, holder.partition_key_data.as_ref());
        end_structure(msg);
    }

    /// Decodes a paging predicate holder.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<PagingPredicateHolder> {
        let mut fields = open_structure(cursor)?;
        let page_size = fields.int()?;
        let page = fields.int()?;
        let iteration_type_id = fields.byte()?;
        let anchor_data_list_holder = AnchorDataListHolderCodec::decode(cursor)?;
        let predicate_data = DataCodec::decode_nullable(cursor)?;
        let comparator_data = DataCodec::decode_nullable(cursor)?;
        let partition_key_data = DataCodec::decode_nullable(cursor)?;
        CodecUtil::fast_forward_to_end_frame(cursor)?;
        Ok(PagingPredicateHolder {
            anchor_data_list_holder,
            predicate_data,
            comparator_data,
            page_size,
            page,
            iteration_type_id,
            partition_key_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::roundtrip;
    use super::*;
    use crate::serialization::ToData;

    fn anchors() -> AnchorDataListHolder {
        AnchorDataListHolder {
            anchor_page_list: vec![0, 1],
            anchor_data_list: vec![
                ("a".to_data().unwrap(), 1i32.to_data().unwrap()),
                ("b".to_data().unwrap(), 2i32.to_data().unwrap()),
            ],
        }
    }

    #[test]
    fn test_anchor_holder_has_no_initial_frame() {
        let mut msg = ClientMessage::new();
        AnchorDataListHolderCodec::encode(&mut msg, &AnchorDataListHolder::default());
        let frames = msg.frames();
        // begin, int list, entry list begin + end, end
        assert_eq!(frames.len(), 5);
        assert!(frames[0].is_begin_frame());
        assert!(frames[1].content.is_empty());
        assert!(frames[2].is_begin_frame());
        assert!(frames[3].is_end_frame());
        assert!(frames[4].is_end_frame());
    }

    #[test]
    fn test_anchor_holder_roundtrip() {
        let holder = anchors();
        assert_eq!(
            roundtrip(
                &holder,
                AnchorDataListHolderCodec::encode,
                AnchorDataListHolderCodec::decode,
            ),
            holder
        );
    }

    #[test]
    fn test_paging_holder_roundtrip() {
        let holder = PagingPredicateHolder {
            anchor_data_list_holder: anchors(),
            predicate_data: Some("p".to_data().unwrap()),
            comparator_data: None,
            page_size: 10,
            page: 2,
            iteration_type_id: 1,
            partition_key_data: None,
        };
        assert_eq!(
            roundtrip(
                &holder,
                PagingPredicateHolderCodec::encode,
                PagingPredicateHolderCodec::decode,
            ),
            holder
        );
    }
}
