//! Codecs for the structured values that appear inside message bodies:
//! strings, opaque data, lists, maps, packed fixed-size lists and SQL pages.

mod codec_util;
mod errors;
mod fixed_list;
mod list;
mod scalar;
mod sql_page;

pub use codec_util::CodecUtil;
pub use errors::ErrorsCodec;
pub use fixed_list::{
    EntryListIntegerIntegerCodec, EntryListIntegerLongCodec, EntryListIntegerUUIDCodec,
    EntryListUUIDListIntegerCodec, EntryListUUIDLongCodec, FixedSizeEntryListCodec,
    FixedSizeListCodec, FixedSizeType, FloatArrayCodec, ListCNFixedSizeCodec, ListIntegerCodec,
    ListLongCodec, ListUUIDCodec, LongArrayCodec, MAX_NULL_ONLY_COUNT,
};
pub use list::{EntryListCodec, ListMultiFrameCodec, MapCodec};
pub use scalar::{
    BigDecimalCodec, ByteArrayCodec, DataCodec, HazelcastJsonValue, HazelcastJsonValueCodec,
    StringCodec,
};
pub use sql_page::{SqlColumn, SqlColumnType, SqlPage, SqlPageCodec};
