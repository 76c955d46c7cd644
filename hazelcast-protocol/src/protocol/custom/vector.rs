use std::collections::HashMap;

use super::{begin_structure, end_structure, open_structure};
use crate::error::Result;
use crate::protocol::builtin::{
    CodecUtil, DataCodec, FloatArrayCodec, ListMultiFrameCodec, MapCodec, StringCodec,
};
use crate::protocol::client_message::{ClientMessage, FrameCursor};
use crate::protocol::fields::FieldWriter;
use crate::serialization::Data;

/// Configuration of a vector index in a vector collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorIndexConfig {
    /// Index name.
    pub name: Option<String>,
    /// Similarity metric: 0 Euclidean, 1 cosine, 2 dot product.
    pub metric: i32,
    /// Vector dimension.
    pub dimension: i32,
    /// Maximum node degree of the graph.
    pub max_degree: i32,
    /// Beam width used while building the graph.
    pub ef_construction: i32,
    /// Whether identical vectors are stored once.
    pub use_deduplication: bool,
}

/// Codec for [`VectorIndexConfig`].
pub struct VectorIndexConfigCodec;

impl VectorIndexConfigCodec {
    /// Encodes `config`.
    pub fn encode(msg: &mut ClientMessage, config: &VectorIndexConfig) {
        begin_structure(
            msg,
            FieldWriter::new()
                .int(config.metric)
                .int(config.dimension)
                .int(config.max_degree)
                .int(config.ef_construction)
                .boolean(config.use_deduplication),
        );
        CodecUtil::encode_nullable(msg, config.name.as_deref(), StringCodec::encode);
        end_structure(msg);
    }

    /// Decodes a vector index configuration.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<VectorIndexConfig> {
        let mut fields = open_structure(cursor)?;
        let metric = fields.int()?;
        let dimension = fields.int()?;
        let max_degree = fields.int()?;
        let ef_construction = fields.int()?;
        let use_deduplication = fields.boolean()?;
        let name = CodecUtil::decode_nullable(cursor, StringCodec::decode)?;
        CodecUtil::fast_forward_to_end_frame(cursor)?;
        Ok(VectorIndexConfig {
            name,
            metric,
            dimension,
            max_degree,
            ef_construction,
            use_deduplication,
        })
    }
}

/// A named vector of an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorPair {
    /// Name of the index the vector belongs to.
    pub name: String,
    /// Vector kind; 0 is a dense float vector.
    pub vector_type: i8,
    /// Vector components.
    pub vector: Option<Vec<f32>>,
}

/// Codec for [`VectorPair`].
pub struct VectorPairCodec;

impl VectorPairCodec {
    /// Encodes `pair`.
    pub fn encode(msg: &mut ClientMessage, pair: &VectorPair) {
        begin_structure(msg, FieldWriter::new().byte(pair.vector_type));
        StringCodec::encode(msg, &pair.name);
        CodecUtil::encode_nullable(msg, pair.vector.as_deref(), FloatArrayCodec::encode);
        end_structure(msg);
    }

    /// Decodes a vector pair.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<VectorPair> {
        let mut fields = open_structure(cursor)?;
        let vector_type = fields.byte()?;
        let name = StringCodec::decode(cursor)?;
        let vector = FloatArrayCodec::decode_nullable(cursor)?;
        CodecUtil::fast_forward_to_end_frame(cursor)?;
        Ok(VectorPair {
            name,
            vector_type,
            vector,
        })
    }
}

/// Options of a vector similarity search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorSearchOptions {
    /// Return entry values.
    pub include_value: bool,
    /// Return entry vectors.
    pub include_vectors: bool,
    /// Maximum number of results.
    pub limit: i32,
    /// Implementation-specific hints.
    pub hints: Option<HashMap<String, String>>,
}

/// Codec for [`VectorSearchOptions`].
pub struct VectorSearchOptionsCodec;

impl VectorSearchOptionsCodec {
    /// Encodes `options`.
    pub fn encode(msg: &mut ClientMessage, options: &VectorSearchOptions) {
        begin_structure(
            msg,
            FieldWriter::new()
                .boolean(options.include_value)
                .boolean(options.include_vectors)
                .int(options.limit),
        );
        MapCodec::encode_nullable(
            msg,
            options.hints.as_ref(),
            |m, k| StringCodec::encode(m, k),
            |m, v| StringCodec::encode(m, v),
        );
        end_structure(msg);
    }

    /// Decodes search options.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<VectorSearchOptions> {
        let mut fields = open_structure(cursor)?;
        let include_value = fields.boolean()?;
        let include_vectors = fields.boolean()?;
        let limit = fields.int()?;
        let hints = MapCodec::decode_nullable(cursor, StringCodec::decode, StringCodec::decode)?;
        CodecUtil::fast_forward_to_end_frame(cursor)?;
        Ok(VectorSearchOptions {
            include_value,
            include_vectors,
            limit,
            hints,
        })
    }
}

/// One hit of a vector similarity search.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorSearchResult {
    /// Serialized key.
    pub key: Data,
    /// Serialized value, if requested.
    pub value: Option<Data>,
    /// Similarity score.
    pub score: f32,
    /// Vectors of the entry, if requested.
    pub vectors: Option<Vec<VectorPair>>,
}

/// Codec for [`VectorSearchResult`].
pub struct VectorSearchResultCodec;

impl VectorSearchResultCodec {
    /// Encodes `result`.
    pub fn encode(msg: &mut ClientMessage, result: &VectorSearchResult) {
        begin_structure(msg, FieldWriter::new().float(result.score));
        DataCodec::encode(msg, &result.key);
        DataCodec::encode_nullable(msg, result.value.as_ref());
        ListMultiFrameCodec::encode_nullable(msg, result.vectors.as_ref(), VectorPairCodec::encode);
        end_structure(msg);
    }

    /// Decodes a search hit.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<VectorSearchResult> {
        let mut fields = open_structure(cursor)?;
        let score = fields.float()?;
        let key = DataCodec::decode(cursor)?;
        let value = DataCodec::decode_nullable(cursor)?;
        let vectors = ListMultiFrameCodec::decode_nullable(cursor, VectorPairCodec::decode)?;
        CodecUtil::fast_forward_to_end_frame(cursor)?;
        Ok(VectorSearchResult {
            key,
            value,
            score,
            vectors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::roundtrip;
    use super::*;
    use crate::serialization::ToData;

    #[test]
    fn test_index_config_roundtrip() {
        let config = VectorIndexConfig {
            name: Some("embeddings".to_string()),
            metric: 1,
            dimension: 768,
            max_degree: 16,
            ef_construction: 100,
            use_deduplication: true,
        };
        let mut msg = ClientMessage::new();
        VectorIndexConfigCodec::encode(&mut msg, &config);
        assert_eq!(msg.frames()[1].content.len(), 17);
        assert_eq!(
            roundtrip(&config, VectorIndexConfigCodec::encode, VectorIndexConfigCodec::decode),
            config
        );
    }

    #[test]
    fn test_search_options_roundtrip() {
        let with_hints = VectorSearchOptions {
            include_value: true,
            include_vectors: false,
            limit: 5,
            hints: Some(HashMap::from([("partitionLimit".to_string(), "3".to_string())])),
        };
        let without_hints = VectorSearchOptions {
            hints: None,
            ..with_hints.clone()
        };
        for options in [with_hints, without_hints] {
            assert_eq!(
                roundtrip(
                    &options,
                    VectorSearchOptionsCodec::encode,
                    VectorSearchOptionsCodec::decode,
                ),
                options
            );
        }
    }

    #[test]
    fn test_search_result_roundtrip() {
        let result = VectorSearchResult {
            key: "k".to_data().unwrap(),
            value: None,
            score: 0.75,
            vectors: Some(vec![
                VectorPair {
                    name: "v".to_string(),
                    vector_type: 0,
                    vector: Some(vec![0.5, -1.0, 2.25]),
                },
                VectorPair {
                    name: "empty".to_string(),
                    vector_type: 0,
                    vector: None,
                },
            ]),
        };
        assert_eq!(
            roundtrip(&result, VectorSearchResultCodec::encode, VectorSearchResultCodec::decode),
            result
        );
    }
}
