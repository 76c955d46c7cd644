use super::{begin_structure, end_structure, open_structure};
use crate::error::Result;
use crate::protocol::builtin::{CodecUtil, ListMultiFrameCodec, StringCodec};
use crate::protocol::client_message::{ClientMessage, FrameCursor};
use crate::protocol::fields::FieldWriter;

/// Options of a bitmap index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapIndexOptions {
    /// Attribute used as the unique key of indexed entries.
    pub unique_key: String,
    /// How unique keys are mapped to bitmap positions: 0 object, 1 long,
    /// 2 raw.
    pub unique_key_transformation: i32,
}

impl Default for BitmapIndexOptions {
    fn default() -> Self {
        Self {
            unique_key: "__key".to_string(),
            unique_key_transformation: 0,
        }
    }
}

/// Codec for [`BitmapIndexOptions`].
pub struct BitmapIndexOptionsCodec;

impl BitmapIndexOptionsCodec {
    /// Encodes `options`.
    pub fn encode(msg: &mut ClientMessage, options: &BitmapIndexOptions) {
        begin_structure(msg, FieldWriter::new().int(options.unique_key_transformation));
        StringCodec::encode(msg, &options.unique_key);
        end_structure(msg);
    }

    /// Decodes bitmap index options.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<BitmapIndexOptions> {
        let mut fields = open_structure(cursor)?;
        let unique_key_transformation = fields.int()?;
        let unique_key = StringCodec::decode(cursor)?;
        CodecUtil::fast_forward_to_end_frame(cursor)?;
        Ok(BitmapIndexOptions {
            unique_key,
            unique_key_transformation,
        })
    }
}

/// Definition of a map index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Index name; generated by the member when absent.
    pub name: Option<String>,
    /// Index type, one of [`IndexConfig::SORTED`], [`IndexConfig::HASH`] or
    /// [`IndexConfig::BITMAP`].
    pub index_type: i32,
    /// Indexed attributes.
    pub attributes: Vec<String>,
    /// Bitmap options, for bitmap indexes only.
    pub bitmap_index_options: Option<BitmapIndexOptions>,
}

impl IndexConfig {
    /// Sorted index, supports range queries.
    pub const SORTED: i32 = 0;
    /// Hash index, equality only.
    pub const HASH: i32 = 1;
    /// Bitmap index.
    pub const BITMAP: i32 = 2;

    /// Creates an unnamed index over `attributes`.
    pub fn new<I, S>(index_type: i32, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            index_type,
            attributes: attributes.into_iter().map(Into::into).collect(),
            bitmap_index_options: None,
        }
    }
}

/// Codec for [`IndexConfig`].
pub struct IndexConfigCodec;

impl IndexConfigCodec {
    /// Encodes `config`.
    pub fn encode(msg: &mut ClientMessage, config: &IndexConfig) {
        begin_structure(msg, FieldWriter::new().int(config.index_type));
        CodecUtil::encode_nullable(msg, config.name.as_deref(), StringCodec::encode);
        ListMultiFrameCodec::encode(msg, &config.attributes, |m, a| StringCodec::encode(m, a));
        CodecUtil::encode_nullable(
            msg,
            config.bitmap_index_options.as_ref(),
            BitmapIndexOptionsCodec::encode,
        );
        end_structure(msg);
    }

    /// Decodes an index definition.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<IndexConfig> {
        let mut fields = open_structure(cursor)?;
        let index_type = fields.int()?;
        let name = CodecUtil::decode_nullable(cursor, StringCodec::decode)?;
        let attributes = ListMultiFrameCodec::decode(cursor, StringCodec::decode)?;
        let bitmap_index_options =
            CodecUtil::decode_nullable(cursor, BitmapIndexOptionsCodec::decode)?;
        CodecUtil::fast_forward_to_end_frame(cursor)?;
        Ok(IndexConfig {
            name,
            index_type,
            attributes,
            bitmap_index_options,
        })
    }
}
