use uuid::Uuid;

use super::{operation, RequestBuilder, ResponseReader};
use crate::error::Result;
use crate::protocol::builtin::{DataCodec, StringCodec};
use crate::protocol::client_message::ClientMessage;
use crate::protocol::custom::{RaftGroupId, RaftGroupIdCodec};
use crate::serialization::Data;

/// Appends the group id and object name every CP request carries.
fn encode_target(msg: &mut ClientMessage, group_id: &RaftGroupId, name: &str) {
    RaftGroupIdCodec::encode(msg, group_id);
    StringCodec::encode(msg, name);
}

operation!(
    /// Adds a delta to an atomic long and returns the new value.
    AtomicLongAddAndGetCodec,
    "AtomicLong.AddAndGet",
    0x090300,
    retryable = false
);

impl AtomicLongAddAndGetCodec {
    /// Encodes the request.
    pub fn encode_request(group_id: &RaftGroupId, name: &str, delta: i64) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().long(delta).build();
        encode_target(&mut msg, group_id, name);
        msg
    }

    /// Decodes the updated value.
    pub fn decode_response(msg: &ClientMessage) -> Result<i64> {
        ResponseReader::response(msg)?.fields.long()
    }
}

operation!(
    /// Reads an atomic long.
    AtomicLongGetCodec,
    "AtomicLong.Get",
    0x090500,
    retryable = true
);

impl AtomicLongGetCodec {
    /// Encodes the request.
    pub fn encode_request(group_id: &RaftGroupId, name: &str) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().build();
        encode_target(&mut msg, group_id, name);
        msg
    }

    /// Decodes the current value.
    pub fn decode_response(msg: &ClientMessage) -> Result<i64> {
        ResponseReader::response(msg)?.fields.long()
    }
}

operation!(
    /// Applies a function to an atomic reference.
    AtomicRefApplyCodec,
    "AtomicRef.Apply",
    0x0A0100,
    retryable = false
);

impl AtomicRefApplyCodec {
    /// Return the value before the function is applied.
    pub const RETURN_OLD_VALUE: i32 = 0;
    /// Return the value after the function is applied.
    pub const RETURN_NEW_VALUE: i32 = 1;
    /// Return the function's own result.
    pub const RETURN_NO_VALUE: i32 = 2;

    /// Encodes the request. With `alter` set, the function's result
    /// replaces the stored value.
    pub fn encode_request(
        group_id: &RaftGroupId,
        name: &str,
        function: &Data,
        return_value_type: i32,
        alter: bool,
    ) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>()
            .int(return_value_type)
            .boolean(alter)
            .build();
        encode_target(&mut msg, group_id, name);
        DataCodec::encode(&mut msg, function);
        msg
    }

    /// Decodes the selected value.
    pub fn decode_response(msg: &ClientMessage) -> Result<Option<Data>> {
        let mut reader = ResponseReader::response(msg)?;
        DataCodec::decode_nullable(&mut reader.frames)
    }
}

operation!(
    /// Waits until a count down latch reaches zero.
    CountDownLatchAwaitCodec,
    "CountDownLatch.Await",
    0x0B0200,
    retryable = true
);

impl CountDownLatchAwaitCodec {
    /// Encodes the request. `invocation_uid` makes retries idempotent.
    pub fn encode_request(
        group_id: &RaftGroupId,
        name: &str,
        invocation_uid: Uuid,
        timeout_millis: i64,
    ) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>()
            .uuid(Some(invocation_uid))
            .long(timeout_millis)
            .build();
        encode_target(&mut msg, group_id, name);
        msg
    }

    /// Decodes whether the latch reached zero before the timeout.
    pub fn decode_response(msg: &ClientMessage) -> Result<bool> {
        ResponseReader::response(msg)?.fields.boolean()
    }
}

operation!(
    /// Reads who holds a fenced lock.
    FencedLockGetLockOwnershipCodec,
    "FencedLock.GetLockOwnership",
    0x070400,
    retryable = true
);

/// Ownership state of a fenced lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOwnership {
    /// Fencing token of the current acquisition; 0 when unlocked.
    pub fence: i64,
    /// Reentrant acquisition count.
    pub lock_count: i32,
    /// CP session of the holder.
    pub session_id: i64,
    /// Thread of the holder.
    pub thread_id: i64,
}

impl LockOwnership {
    /// Returns true if any session holds the lock.
    pub fn is_locked(&self) -> bool {
        self.fence != 0
    }
}

impl FencedLockGetLockOwnershipCodec {
    /// Encodes the request.
    pub fn encode_request(group_id: &RaftGroupId, name: &str) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().build();
        encode_target(&mut msg, group_id, name);
        msg
    }

    /// Decodes the ownership state.
    pub fn decode_response(msg: &ClientMessage) -> Result<LockOwnership> {
        let mut reader = ResponseReader::response(msg)?;
        Ok(LockOwnership {
            fence: reader.fields.long()?,
            lock_count: reader.fields.int()?,
            session_id: reader.fields.long()?,
            thread_id: reader.fields.long()?,
        })
    }
}

operation!(
    /// Opens a CP session for this client in a CP group.
    CPSessionCreateSessionCodec,
    "CPSession.CreateSession",
    0x1F0100,
    retryable = true
);

/// A newly created CP session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionResponse {
    /// Session id.
    pub session_id: i64,
    /// Time after which the session expires without heartbeats.
    pub ttl_millis: i64,
    /// Heartbeat period.
    pub heartbeat_millis: i64,
}

impl CPSessionCreateSessionCodec {
    /// Encodes the request.
    pub fn encode_request(group_id: &RaftGroupId, endpoint_name: &str) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().build();
        encode_target(&mut msg, group_id, endpoint_name);
        msg
    }

    /// Decodes the session.
    pub fn decode_response(msg: &ClientMessage) -> Result<SessionResponse> {
        let mut reader = ResponseReader::response(msg)?;
        Ok(SessionResponse {
            session_id: reader.fields.long()?,
            ttl_millis: reader.fields.long()?,
            heartbeat_millis: reader.fields.long()?,
        })
    }
}
