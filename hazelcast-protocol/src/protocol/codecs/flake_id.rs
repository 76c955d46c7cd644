use super::{operation, RequestBuilder, ResponseReader};
use crate::error::Result;
use crate::protocol::builtin::StringCodec;
use crate::protocol::client_message::ClientMessage;

operation!(
    /// Reserves a batch of cluster-unique ids.
    FlakeIdGeneratorNewIdBatchCodec,
    "FlakeIdGenerator.NewIdBatch",
    0x1C0100,
    retryable = true
);

/// A batch of ids: `base`, `base + increment`, ... `batch_size` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdBatch {
    /// First id of the batch.
    pub base: i64,
    /// Distance between consecutive ids.
    pub increment: i64,
    /// Number of ids.
    pub batch_size: i32,
}

impl IdBatch {
    /// Iterates over the ids of the batch.
    pub fn ids(&self) -> impl Iterator<Item = i64> {
        let IdBatch {
            base,
            increment,
            batch_size,
        } = *self;
        (0..batch_size.max(0) as i64).map(move |i| base + i * increment)
    }
}

impl FlakeIdGeneratorNewIdBatchCodec {
    /// Encodes the request.
    pub fn encode_request(name: &str, batch_size: i32) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().int(batch_size).build();
        StringCodec::encode(&mut msg, name);
        msg
    }

    /// Decodes the batch.
    pub fn decode_response(msg: &ClientMessage) -> Result<IdBatch> {
        let mut reader = ResponseReader::response(msg)?;
        Ok(IdBatch {
            base: reader.fields.long()?,
            increment: reader.fields.long()?,
            batch_size: reader.fields.int()?,
        })
    }
}
