//! Codecs for the composite types exchanged with the cluster.
//!
//! Every custom type travels as a data structure: a BEGIN frame, an initial
//! frame with the fixed-size fields (left out when the type has none), the
//! variable-size fields in declaration order, and an END frame. Decoders skip
//! whatever trails the fields they know, so newer members can append fields
//! without breaking older clients.

mod address;
mod entry_view;
mod error_holder;
mod index;
mod member;
mod paging;
mod raft;
mod schema;
mod sql;
mod vector;

pub use address::{Address, AddressCodec};
pub use entry_view::{SimpleEntryView, SimpleEntryViewCodec};
pub use error_holder::{ErrorHolder, ErrorHolderCodec, StackTraceElement, StackTraceElementCodec};
pub use index::{BitmapIndexOptions, BitmapIndexOptionsCodec, IndexConfig, IndexConfigCodec};
pub use member::{
    EndpointQualifier, EndpointQualifierCodec, MemberInfo, MemberInfoCodec, MemberVersion,
    MemberVersionCodec,
};
pub use paging::{
    AnchorDataListHolder, AnchorDataListHolderCodec, PagingPredicateHolder,
    PagingPredicateHolderCodec,
};
pub use raft::{RaftGroupId, RaftGroupIdCodec};
pub use schema::{FieldDescriptor, FieldDescriptorCodec, Schema, SchemaCodec};
pub use sql::{
    SqlColumnMetadata, SqlColumnMetadataCodec, SqlError, SqlErrorCodec, SqlQueryId,
    SqlQueryIdCodec,
};
pub use vector::{
    VectorIndexConfig, VectorIndexConfigCodec, VectorPair, VectorPairCodec, VectorSearchOptions,
    VectorSearchOptionsCodec, VectorSearchResult, VectorSearchResultCodec,
};

use super::client_message::{ClientMessage, FrameCursor};
use super::constants::DEFAULT_FLAGS;
use super::fields::{FieldReader, FieldWriter};
use super::frame::Frame;
use crate::error::Result;

/// Opens a structure whose fixed fields are in `fields`.
fn begin_structure(msg: &mut ClientMessage, fields: FieldWriter) {
    msg.add_frame(Frame::new_begin_frame());
    msg.add_frame(fields.into_frame(DEFAULT_FLAGS));
}

/// Consumes the BEGIN frame and the initial frame, returning a reader over
/// the fixed fields.
fn open_structure<'a>(cursor: &mut FrameCursor<'a>) -> Result<FieldReader<'a>> {
    cursor.next()?;
    let initial = cursor.next()?;
    Ok(FieldReader::new(&initial.content, 0))
}

fn end_structure(msg: &mut ClientMessage) {
    msg.add_frame(Frame::new_end_frame());
}

#[cfg(test)]
fn roundtrip<T, E, D>(value: &T, encode: E, decode: D) -> T
where
    E: FnOnce(&mut ClientMessage, &T),
    D: for<'a> FnOnce(&mut FrameCursor<'a>) -> Result<T>,
{
    let mut msg = ClientMessage::new();
    encode(&mut msg, value);
    msg.add_frame(Frame::from_slice(b"next"));

    let mut cursor = msg.cursor();
    let decoded = decode(&mut cursor).unwrap();
    assert_eq!(&cursor.next().unwrap().content[..], b"next");
    decoded
}
