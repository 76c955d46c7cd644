//! Request and response codecs for individual operations.
//!
//! Each operation is a unit struct implementing [`Operation`], with an
//! `encode_request` function producing a ready-to-send [`ClientMessage`] and
//! a `decode_response` function reading the matching response. Listener
//! registrations additionally decode their events.

mod client;
mod cp;
mod flake_id;
mod list;
mod map;
mod pn_counter;
mod queue;
mod ringbuffer;
mod sql;
mod topic;
mod transaction;

pub use client::{
    AuthenticationResponse, AuthenticationStatus, ClientAddClusterViewListenerCodec,
    ClientAuthenticationCodec, ClientFetchSchemaCodec, ClientPingCodec, ClientSendSchemaCodec,
    ClusterViewEvent,
};
pub use cp::{
    AtomicLongAddAndGetCodec, AtomicLongGetCodec, AtomicRefApplyCodec, CPSessionCreateSessionCodec,
    CountDownLatchAwaitCodec, FencedLockGetLockOwnershipCodec, LockOwnership, SessionResponse,
};
pub use flake_id::{FlakeIdGeneratorNewIdBatchCodec, IdBatch};
pub use list::{ListAddAllCodec, ListGetCodec};
pub use map::{
    EntryViewResponse, MapAddIndexCodec, MapContainsKeyCodec, MapEntriesWithPagingPredicateCodec,
    MapEntriesWithPredicateCodec, MapGetCodec, MapGetEntryViewCodec, MapIsEmptyCodec,
    MapKeySetWithPagingPredicateCodec, MapKeySetWithPredicateCodec, MapPutCodec, MapRemoveCodec,
    MapReplaceCodec, MapSetWithMaxIdleCodec, MapSizeCodec, MapValuesWithPagingPredicateCodec,
    MapValuesWithPredicateCodec, PagedResponse,
};
pub use pn_counter::{PNCounterAddCodec, PNCounterGetCodec, PNCounterResponse};
pub use queue::{QueueOfferCodec, QueuePollCodec, QueueSizeCodec};
pub use ringbuffer::{ReadManyResponse, RingbufferReadManyCodec, RingbufferSizeCodec};
pub use sql::{SqlCloseCodec, SqlExecuteCodec, SqlExecuteResponse, SqlFetchCodec, SqlFetchResponse};
pub use topic::{TopicAddMessageListenerCodec, TopicMessageEvent, TopicPublishCodec};
pub use transaction::TransactionCreateCodec;

use uuid::Uuid;

use super::client_message::{ClientMessage, FrameCursor};
use super::constants::*;
use super::fields::{FieldReader, FieldWriter};
use super::fixed_size;
use crate::error::Result;

/// Static description of an operation.
pub trait Operation {
    /// Diagnostic name, such as `Map.Put`.
    const NAME: &'static str;
    /// Message type of the request.
    const REQUEST_TYPE: i32;
    /// Message type of the response.
    const RESPONSE_TYPE: i32 = Self::REQUEST_TYPE + 1;
    /// Whether the request may be resent after a connection failure.
    const RETRYABLE: bool;
}

macro_rules! operation {
    (
        $(#[$doc:meta])*
        $codec:ident, $name:literal, $request_type:expr, retryable = $retryable:literal
    ) => {
        $(#[$doc])*
        pub struct $codec;

        impl crate::protocol::codecs::Operation for $codec {
            const NAME: &'static str = $name;
            const REQUEST_TYPE: i32 = $request_type;
            const RETRYABLE: bool = $retryable;
        }
    };
}
pub(crate) use operation;

macro_rules! fixed_field_setters {
    () => {
        /// Appends a signed byte.
        pub fn byte(mut self, value: i8) -> Self {
            self.fields = self.fields.byte(value);
            self
        }

        /// Appends a boolean.
        pub fn boolean(mut self, value: bool) -> Self {
            self.fields = self.fields.boolean(value);
            self
        }

        /// Appends an i32.
        pub fn int(mut self, value: i32) -> Self {
            self.fields = self.fields.int(value);
            self
        }

        /// Appends an i64.
        pub fn long(mut self, value: i64) -> Self {
            self.fields = self.fields.long(value);
            self
        }

        /// Appends a nullable UUID.
        pub fn uuid(mut self, value: Option<Uuid>) -> Self {
            self.fields = self.fields.uuid(value);
            self
        }
    };
}

/// Builds the initial frame of a request.
///
/// The header carries the message type, a zero correlation id (assigned by
/// the invocation layer just before sending) and partition id -1; fixed
/// fields follow in the order they are appended.
#[derive(Debug)]
pub struct RequestBuilder {
    fields: FieldWriter,
    message_type: i32,
    retryable: bool,
    operation_name: &'static str,
}

impl RequestBuilder {
    /// Starts a request of `message_type`.
    pub fn new(message_type: i32) -> Self {
        Self {
            fields: FieldWriter::with_header(REQUEST_HEADER_SIZE),
            message_type,
            retryable: false,
            operation_name: "",
        }
    }

    /// Starts a request for operation `O`.
    pub fn for_operation<O: Operation>() -> Self {
        let mut builder = Self::new(O::REQUEST_TYPE);
        builder.retryable = O::RETRYABLE;
        builder.operation_name = O::NAME;
        builder
    }

    fixed_field_setters!();

    /// Finishes the initial frame; variable-size fields are appended to the
    /// returned message.
    pub fn build(self) -> ClientMessage {
        let mut fields = self.fields;
        let header = fields.content_mut();
        fixed_size::encode_int(header, TYPE_FIELD_OFFSET, self.message_type);
        fixed_size::encode_int(header, PARTITION_ID_FIELD_OFFSET, PARTITION_ID_ANY);

        let mut msg = ClientMessage::from_frame(fields.into_frame(UNFRAGMENTED_MESSAGE));
        msg.set_retryable(self.retryable);
        msg.set_operation_name(self.operation_name);
        msg
    }
}

/// Builds the initial frame of a response or event, as a member would.
///
/// Useful for exercising decoders and for in-process test servers.
#[derive(Debug)]
pub struct ResponseBuilder {
    fields: FieldWriter,
    message_type: i32,
    event: bool,
}

impl ResponseBuilder {
    /// Starts a response of `message_type`.
    pub fn response(message_type: i32) -> Self {
        Self {
            fields: FieldWriter::with_header(RESPONSE_HEADER_SIZE),
            message_type,
            event: false,
        }
    }

    /// Starts an event of `message_type`.
    pub fn event(message_type: i32) -> Self {
        Self {
            fields: FieldWriter::with_header(EVENT_HEADER_SIZE),
            message_type,
            event: true,
        }
    }

    fixed_field_setters!();

    /// Finishes the initial frame.
    pub fn build(self) -> ClientMessage {
        let mut fields = self.fields;
        let header = fields.content_mut();
        fixed_size::encode_int(header, TYPE_FIELD_OFFSET, self.message_type);
        let flags = if self.event {
            fixed_size::encode_int(header, PARTITION_ID_FIELD_OFFSET, PARTITION_ID_ANY);
            UNFRAGMENTED_MESSAGE | IS_EVENT_FLAG
        } else {
            UNFRAGMENTED_MESSAGE
        };
        ClientMessage::from_frame(fields.into_frame(flags))
    }
}

/// Splits a received message into its fixed fields and the frames that
/// follow the initial frame.
#[derive(Debug)]
pub struct ResponseReader<'a> {
    /// Fixed fields of the initial frame, positioned after the header.
    pub fields: FieldReader<'a>,
    /// Cursor over the remaining frames.
    pub frames: FrameCursor<'a>,
}

impl<'a> ResponseReader<'a> {
    /// Opens a response; fields start after the 13-byte response header.
    pub fn response(msg: &'a ClientMessage) -> Result<Self> {
        Self::open(msg, RESPONSE_HEADER_SIZE)
    }

    /// Opens an event; fields start after the 16-byte event header.
    pub fn event(msg: &'a ClientMessage) -> Result<Self> {
        Self::open(msg, EVENT_HEADER_SIZE)
    }

    fn open(msg: &'a ClientMessage, header_size: usize) -> Result<Self> {
        let mut frames = msg.cursor();
        let initial = frames.next()?;
        Ok(Self {
            fields: FieldReader::new(&initial.content, header_size),
            frames,
        })
    }
}
