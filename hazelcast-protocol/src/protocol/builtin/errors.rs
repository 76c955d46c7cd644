use super::ListMultiFrameCodec;
use crate::error::Result;
use crate::protocol::client_message::{ClientMessage, FrameCursor};
use crate::protocol::custom::{ErrorHolder, ErrorHolderCodec};

/// Body of an exception response (message type 0): a list of error holders,
/// outermost cause first.
pub struct ErrorsCodec;

impl ErrorsCodec {
    /// Decodes the error chain carried by `msg`.
    pub fn decode(msg: &ClientMessage) -> Result<Vec<ErrorHolder>> {
        let mut cursor = msg.cursor();
        // initial frame
        cursor.next()?;
        Self::decode_list(&mut cursor)
    }

    /// Decodes the error list at the cursor.
    pub fn decode_list(cursor: &mut FrameCursor<'_>) -> Result<Vec<ErrorHolder>> {
        ListMultiFrameCodec::decode(cursor, ErrorHolderCodec::decode)
    }

    /// Appends the error list to `msg`.
    pub fn encode(msg: &mut ClientMessage, errors: &[ErrorHolder]) {
        ListMultiFrameCodec::encode(msg, errors, ErrorHolderCodec::encode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::codecs::ResponseBuilder;
    use crate::protocol::constants::EXCEPTION_MESSAGE_TYPE;
    use crate::protocol::custom::StackTraceElement;

    #[test]
    fn test_exception_response() {
        let errors = vec![
            ErrorHolder {
                error_code: 8,
                class_name: "java.lang.IllegalStateException".to_string(),
                message: Some("bad state".to_string()),
                stack_trace: vec![StackTraceElement {
                    class_name: "com.hazelcast.Foo".to_string(),
                    method_name: "bar".to_string(),
                    file_name: None,
                    line_number: 12,
                }],
            },
            ErrorHolder {
                error_code: 1,
                class_name: "java.lang.RuntimeException".to_string(),
                message: None,
                stack_trace: vec![],
            },
        ];

        let mut msg = ResponseBuilder::response(EXCEPTION_MESSAGE_TYPE).build();
        ErrorsCodec::encode(&mut msg, &errors);

        assert_eq!(ErrorsCodec::decode(&msg).unwrap(), errors);
    }
}
