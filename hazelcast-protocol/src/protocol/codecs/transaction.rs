use uuid::Uuid;

use super::{operation, RequestBuilder, ResponseReader};
use crate::error::Result;
use crate::protocol::client_message::ClientMessage;

operation!(
    /// Begins a transaction on the connected member.
    TransactionCreateCodec,
    "Transaction.Create",
    0x150200,
    retryable = false
);

impl TransactionCreateCodec {
    /// Two-phase commit.
    pub const TWO_PHASE: i32 = 1;
    /// Single-phase commit.
    pub const ONE_PHASE: i32 = 2;

    /// Encodes the request.
    pub fn encode_request(
        timeout_millis: i64,
        durability: i32,
        transaction_type: i32,
        thread_id: i64,
    ) -> ClientMessage {
        RequestBuilder::for_operation::<Self>()
            .long(timeout_millis)
            .int(durability)
            .int(transaction_type)
            .long(thread_id)
            .build()
    }

    /// Decodes the transaction id.
    pub fn decode_response(msg: &ClientMessage) -> Result<Option<Uuid>> {
        ResponseReader::response(msg)?.fields.uuid()
    }
}
