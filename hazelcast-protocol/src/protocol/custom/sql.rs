use uuid::Uuid;

use super::{begin_structure, end_structure, open_structure};
use crate::error::Result;
use crate::protocol::builtin::{CodecUtil, SqlColumnType, StringCodec};
use crate::protocol::client_message::{ClientMessage, FrameCursor};
use crate::protocol::constants::BOOLEAN_SIZE_IN_BYTES;
use crate::protocol::fields::FieldWriter;

/// Name and type of a result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlColumnMetadata {
    /// Column name.
    pub name: String,
    /// Column type.
    pub column_type: SqlColumnType,
    /// Whether the column may hold nulls. Members that do not report it are
    /// assumed to allow them.
    pub nullable: bool,
}

/// Codec for [`SqlColumnMetadata`].
pub struct SqlColumnMetadataCodec;

impl SqlColumnMetadataCodec {
    /// Encodes `column`.
    pub fn encode(msg: &mut ClientMessage, column: &SqlColumnMetadata) {
        begin_structure(
            msg,
            FieldWriter::new().int(column.column_type.id()).boolean(column.nullable),
        );
        StringCodec::encode(msg, &column.name);
        end_structure(msg);
    }

    /// Decodes column metadata.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<SqlColumnMetadata> {
        let mut fields = open_structure(cursor)?;
        let column_type = SqlColumnType::from_id(fields.int()?)?;
        let nullable = if fields.remaining() >= BOOLEAN_SIZE_IN_BYTES {
            fields.boolean()?
        } else {
            true
        };
        let name = StringCodec::decode(cursor)?;
        CodecUtil::fast_forward_to_end_frame(cursor)?;
        Ok(SqlColumnMetadata {
            name,
            column_type,
            nullable,
        })
    }
}

/// An error raised while executing a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlError {
    /// SQL error code.
    pub code: i32,
    /// Error message.
    pub message: Option<String>,
    /// Member where the error happened.
    pub originating_member_id: Uuid,
    /// Suggested fix, such as a mapping to create. Only newer members send
    /// it.
    pub suggestion: Option<String>,
}

/// Codec for [`SqlError`].
pub struct SqlErrorCodec;

impl SqlErrorCodec {
    /// Encodes `error`.
    pub fn encode(msg: &mut ClientMessage, error: &SqlError) {
        begin_structure(
            msg,
            FieldWriter::new().int(error.code).uuid(Some(error.originating_member_id)),
        );
        CodecUtil::encode_nullable(msg, error.message.as_deref(), StringCodec::encode);
        CodecUtil::encode_nullable(msg, error.suggestion.as_deref(), StringCodec::encode);
        end_structure(msg);
    }

    /// Decodes an SQL error.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<SqlError> {
        let mut fields = open_structure(cursor)?;
        let code = fields.int()?;
        let originating_member_id = fields.required_uuid("originating member id")?;
        let message = CodecUtil::decode_nullable(cursor, StringCodec::decode)?;
        let suggestion = if CodecUtil::next_frame_is_data_structure_end_frame(cursor)? {
            None
        } else {
            CodecUtil::decode_nullable(cursor, StringCodec::decode)?
        };
        CodecUtil::fast_forward_to_end_frame(cursor)?;
        Ok(SqlError {
            code,
            message,
            originating_member_id,
            suggestion,
        })
    }

    /// Decodes an SQL error or a null frame.
    pub fn decode_nullable(cursor: &mut FrameCursor<'_>) -> Result<Option<SqlError>> {
        CodecUtil::decode_nullable(cursor, Self::decode)
    }
}

/// Cluster-wide identifier of a running query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SqlQueryId {
    /// High bits of the initiating member's UUID.
    pub member_id_high: i64,
    /// Low bits of the initiating member's UUID.
    pub member_id_low: i64,
    /// High bits of the query's local UUID.
    pub local_id_high: i64,
    /// Low bits of the query's local UUID.
    pub local_id_low: i64,
}

impl SqlQueryId {
    /// Builds a query id from the member the query is sent to and a local
    /// id.
    pub fn new(member_id: Uuid, local_id: Uuid) -> Self {
        let (member_id_high, member_id_low) = split(member_id);
        let (local_id_high, local_id_low) = split(local_id);
        Self {
            member_id_high,
            member_id_low,
            local_id_high,
            local_id_low,
        }
    }

    /// Builds a query id with a random local id.
    pub fn from_member_id(member_id: Uuid) -> Self {
        Self::new(member_id, Uuid::new_v4())
    }

    /// UUID of the member the query runs on.
    pub fn member_id(&self) -> Uuid {
        join(self.member_id_high, self.member_id_low)
    }

    /// Local part of the id.
    pub fn local_id(&self) -> Uuid {
        join(self.local_id_high, self.local_id_low)
    }
}

fn split(uuid: Uuid) -> (i64, i64) {
    let bits = uuid.as_u128();
    ((bits >> 64) as i64, bits as u64 as i64)
}

fn join(high: i64, low: i64) -> Uuid {
    Uuid::from_u128(((high as u64 as u128) << 64) | low as u64 as u128)
}

/// Codec for [`SqlQueryId`].
pub struct SqlQueryIdCodec;

impl SqlQueryIdCodec {
    /// Encodes `query_id`.
    pub fn encode(msg: &mut ClientMessage, query_id: &SqlQueryId) {
        begin_structure(
            msg,
            FieldWriter::new()
                .long(query_id.member_id_high)
                .long(query_id.member_id_low)
                .long(query_id.local_id_high)
                .long(query_id.local_id_low),
        );
        end_structure(msg);
    }

    /// Decodes a query id.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<SqlQueryId> {
        let mut fields = open_structure(cursor)?;
        let query_id = SqlQueryId {
            member_id_high: fields.long()?,
            member_id_low: fields.long()?,
            local_id_high: fields.long()?,
            local_id_low: fields.long()?,
        };
        CodecUtil::fast_forward_to_end_frame(cursor)?;
        Ok(query_id)
    }
}
