use super::{begin_structure, end_structure, open_structure};
use crate::error::Result;
use crate::protocol::builtin::{CodecUtil, ListMultiFrameCodec, StringCodec};
use crate::protocol::client_message::{ClientMessage, FrameCursor};
use crate::protocol::fields::FieldWriter;

/// One frame of a server-side stack trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackTraceElement {
    /// Declaring class.
    pub class_name: String,
    /// Method name.
    pub method_name: String,
    /// Source file, if known.
    pub file_name: Option<String>,
    /// Line number, negative if unknown.
    pub line_number: i32,
}

/// Codec for [`StackTraceElement`].
pub struct StackTraceElementCodec;

impl StackTraceElementCodec {
    /// Encodes `element`.
    pub fn encode(msg: &mut ClientMessage, element: &StackTraceElement) {
        begin_structure(msg, FieldWriter::new().int(element.line_number));
        StringCodec::encode(msg, &element.class_name);
        StringCodec::encode(msg, &element.method_name);
        CodecUtil::encode_nullable(msg, element.file_name.as_deref(), StringCodec::encode);
        end_structure(msg);
    }

    /// Decodes a stack trace element.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<StackTraceElement> {
        let mut fields = open_structure(cursor)?;
        let line_number = fields.int()?;
        let class_name = StringCodec::decode(cursor)?;
        let method_name = StringCodec::decode(cursor)?;
        let file_name = CodecUtil::decode_nullable(cursor, StringCodec::decode)?;
        CodecUtil::fast_forward_to_end_frame(cursor)?;
        Ok(StackTraceElement {
            class_name,
            method_name,
            file_name,
            line_number,
        })
    }
}

/// One exception of the cause chain carried by an error response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorHolder {
    /// Hazelcast error code.
    pub error_code: i32,
    /// Exception class name.
    pub class_name: String,
    /// Exception message.
    pub message: Option<String>,
    /// Server-side stack trace.
    pub stack_trace: Vec<StackTraceElement>,
}

/// Codec for [`ErrorHolder`].
pub struct ErrorHolderCodec;

impl ErrorHolderCodec {
    /// Encodes `holder`.
    pub fn encode(msg: &mut ClientMessage, holder: &ErrorHolder) {
        begin_structure(msg, FieldWriter::new().int(holder.error_code));
        StringCodec::encode(msg, &holder.class_name);
        CodecUtil::encode_nullable(msg, holder.message.as_deref(), StringCodec::encode);
        ListMultiFrameCodec::encode(msg, &holder.stack_trace, StackTraceElementCodec::encode);
        end_structure(msg);
    }

    /// Decodes an error holder.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<ErrorHolder> {
        let mut fields = open_structure(cursor)?;
        let error_code = fields.int()?;
        let class_name = StringCodec::decode(cursor)?;
        let message = CodecUtil::decode_nullable(cursor, StringCodec::decode)?;
        let stack_trace = ListMultiFrameCodec::decode(cursor, StackTraceElementCodec::decode)?;
        CodecUtil::fast_forward_to_end_frame(cursor)?;
        Ok(ErrorHolder {
            error_code,
            class_name,
            message,
            stack_trace,
        })
    }
}
