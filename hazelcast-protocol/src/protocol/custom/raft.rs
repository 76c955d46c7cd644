use super::{begin_structure, end_structure, open_structure};
use crate::error::Result;
use crate::protocol::builtin::{CodecUtil, StringCodec};
use crate::protocol::client_message::{ClientMessage, FrameCursor};
use crate::protocol::fields::FieldWriter;

/// Identifies a CP group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RaftGroupId {
    /// Group name, `default` unless configured otherwise.
    pub name: String,
    /// Seed of the group's incarnation.
    pub seed: i64,
    /// Group id.
    pub id: i64,
}

/// Codec for [`RaftGroupId`].
pub struct RaftGroupIdCodec;

impl RaftGroupIdCodec {
    /// Encodes `group_id`.
    pub fn encode(msg: &mut ClientMessage, group_id: &RaftGroupId) {
        begin_structure(msg, FieldWriter::new().long(group_id.seed).long(group_id.id));
        StringCodec::encode(msg, &group_id.name);
        end_structure(msg);
    }

    /// Decodes a group id.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<RaftGroupId> {
        let mut fields = open_structure(cursor)?;
        let seed = fields.long()?;
        let id = fields.long()?;
        let name = StringCodec::decode(cursor)?;
        CodecUtil::fast_forward_to_end_frame(cursor)?;
        Ok(RaftGroupId { name, seed, id })
    }
}

#[cfg(test)]
mod tests {
    use super::super::roundtrip;
    use super::*;

    #[test]
    fn test_raft_group_id() {
        let group = RaftGroupId {
            name: "default".to_string(),
            seed: 3,
            id: -9,
        };
        let mut msg = ClientMessage::new();
        RaftGroupIdCodec::encode(&mut msg, &group);
        assert_eq!(msg.frames()[1].content.len(), 16);

        assert_eq!(roundtrip(&group, RaftGroupIdCodec::encode, RaftGroupIdCodec::decode), group);
    }
}
