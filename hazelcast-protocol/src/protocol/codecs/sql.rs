use super::{operation, RequestBuilder, ResponseReader};
use crate::error::Result;
use crate::protocol::builtin::{
    CodecUtil, DataCodec, ListMultiFrameCodec, SqlPage, SqlPageCodec, StringCodec,
};
use crate::protocol::client_message::ClientMessage;
use crate::protocol::custom::{
    SqlColumnMetadata, SqlColumnMetadataCodec, SqlError, SqlErrorCodec, SqlQueryId, SqlQueryIdCodec,
};
use crate::serialization::Data;

operation!(
    /// Starts a query and returns its first page.
    SqlExecuteCodec,
    "Sql.Execute",
    0x210400,
    retryable = false
);

/// Response to [`SqlExecuteCodec`].
#[derive(Debug, Clone, PartialEq)]
pub struct SqlExecuteResponse {
    /// Columns of the result, absent for statements without rows.
    pub row_metadata: Option<Vec<SqlColumnMetadata>>,
    /// First page of rows.
    pub row_page: Option<SqlPage>,
    /// Number of affected rows, -1 for queries returning rows.
    pub update_count: i64,
    /// Set when the query failed.
    pub error: Option<SqlError>,
}

impl SqlExecuteCodec {
    /// Any result.
    pub const EXPECT_ANY: i8 = 0;
    /// A row set.
    pub const EXPECT_ROWS: i8 = 1;
    /// An update count.
    pub const EXPECT_UPDATE_COUNT: i8 = 2;

    /// Encodes the request.
    #[allow(clippy::too_many_arguments)]
    pub fn encode_request(
        sql: &str,
        parameters: &[Option<Data>],
        timeout_millis: i64,
        cursor_buffer_size: i32,
        schema: Option<&str>,
        expected_result_type: i8,
        query_id: &SqlQueryId,
    ) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>()
            .long(timeout_millis)
            .int(cursor_buffer_size)
            .byte(expected_result_type)
            .build();
        StringCodec::encode(&mut msg, sql);
        ListMultiFrameCodec::encode_contains_nullable(
            &mut msg,
            parameters.iter().map(Option::as_ref),
            DataCodec::encode,
        );
        CodecUtil::encode_nullable(&mut msg, schema, StringCodec::encode);
        SqlQueryIdCodec::encode(&mut msg, query_id);
        msg
    }

    /// Decodes the first page or the error.
    pub fn decode_response(msg: &ClientMessage) -> Result<SqlExecuteResponse> {
        let mut reader = ResponseReader::response(msg)?;
        let update_count = reader.fields.long()?;
        let row_metadata = ListMultiFrameCodec::decode_nullable(
            &mut reader.frames,
            SqlColumnMetadataCodec::decode,
        )?;
        let row_page = SqlPageCodec::decode_nullable(&mut reader.frames)?;
        let error = SqlErrorCodec::decode_nullable(&mut reader.frames)?;
        Ok(SqlExecuteResponse {
            row_metadata,
            row_page,
            update_count,
            error,
        })
    }
}

operation!(
    /// Fetches the next page of a running query.
    SqlFetchCodec,
    "Sql.Fetch",
    0x210500,
    retryable = false
);

/// Response to [`SqlFetchCodec`].
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFetchResponse {
    /// Next page of rows.
    pub row_page: Option<SqlPage>,
    /// Set when the query failed.
    pub error: Option<SqlError>,
}

impl SqlFetchCodec {
    /// Encodes the request.
    pub fn encode_request(query_id: &SqlQueryId, cursor_buffer_size: i32) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().int(cursor_buffer_size).build();
        SqlQueryIdCodec::encode(&mut msg, query_id);
        msg
    }

    /// Decodes the page or the error.
    pub fn decode_response(msg: &ClientMessage) -> Result<SqlFetchResponse> {
        let mut reader = ResponseReader::response(msg)?;
        let row_page = SqlPageCodec::decode_nullable(&mut reader.frames)?;
        let error = SqlErrorCodec::decode_nullable(&mut reader.frames)?;
        Ok(SqlFetchResponse { row_page, error })
    }
}

operation!(
    /// Releases the server-side cursor of a query.
    SqlCloseCodec,
    "Sql.Close",
    0x210300,
    retryable = false
);

impl SqlCloseCodec {
    /// Encodes the request.
    pub fn encode_request(query_id: &SqlQueryId) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().build();
        SqlQueryIdCodec::encode(&mut msg, query_id);
        msg
    }
}
