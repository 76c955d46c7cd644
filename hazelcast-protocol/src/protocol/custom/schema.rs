use super::{begin_structure, end_structure, open_structure};
use crate::error::Result;
use crate::protocol::builtin::{CodecUtil, ListMultiFrameCodec, StringCodec};
use crate::protocol::client_message::{ClientMessage, FrameCursor};
use crate::protocol::fields::FieldWriter;
use crate::protocol::frame::Frame;

/// A field of a compact schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    /// Field name.
    pub field_name: String,
    /// Field kind id.
    pub kind: i32,
}

/// Codec for [`FieldDescriptor`].
pub struct FieldDescriptorCodec;

impl FieldDescriptorCodec {
    /// Encodes `field`.
    pub fn encode(msg: &mut ClientMessage, field: &FieldDescriptor) {
        begin_structure(msg, FieldWriter::new().int(field.kind));
        StringCodec::encode(msg, &field.field_name);
        end_structure(msg);
    }

    /// Decodes a field descriptor.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<FieldDescriptor> {
        let mut fields = open_structure(cursor)?;
        let kind = fields.int()?;
        let field_name = StringCodec::decode(cursor)?;
        CodecUtil::fast_forward_to_end_frame(cursor)?;
        Ok(FieldDescriptor { field_name, kind })
    }
}

/// A compact serialization schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Schema {
    /// Name of the described type.
    pub type_name: String,
    /// Fields of the type.
    pub fields: Vec<FieldDescriptor>,
}

/// Codec for [`Schema`]. Schemas have no fixed fields and no initial frame.
pub struct SchemaCodec;

impl SchemaCodec {
    /// Encodes `schema`.
    pub fn encode(msg: &mut ClientMessage, schema: &Schema) {
        msg.add_frame(Frame::new_begin_frame());
        StringCodec::encode(msg, &schema.type_name);
        ListMultiFrameCodec::encode(msg, &schema.fields, FieldDescriptorCodec::encode);
        end_structure(msg);
    }

    /// Decodes a schema.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<Schema> {
        cursor.next()?;
        let type_name = StringCodec::decode(cursor)?;
        let fields = ListMultiFrameCodec::decode(cursor, FieldDescriptorCodec::decode)?;
        CodecUtil::fast_forward_to_end_frame(cursor)?;
        Ok(Schema { type_name, fields })
    }

    /// Decodes a schema or a null frame.
    pub fn decode_nullable(cursor: &mut FrameCursor<'_>) -> Result<Option<Schema>> {
        CodecUtil::decode_nullable(cursor, Self::decode)
    }
}

#[cfg(test)]
mod tests {
    use super::super::roundtrip;
    use super::*;

    #[test]
    fn test_schema_roundtrip() {
        let schema = Schema {
            type_name: "Employee".to_string(),
            fields: vec![
                FieldDescriptor {
                    field_name: "age".to_string(),
                    kind: 8,
                },
                FieldDescriptor {
                    field_name: "name".to_string(),
                    kind: 16,
                },
            ],
        };
        assert_eq!(roundtrip(&schema, SchemaCodec::encode, SchemaCodec::decode), schema);
    }
}
