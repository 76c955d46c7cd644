//! Protocol constants for the Hazelcast Open Binary Protocol.

/// Size of the frame length field in bytes.
pub const SIZE_OF_FRAME_LENGTH_FIELD: usize = 4;

/// Size of the frame flags field in bytes.
pub const SIZE_OF_FRAME_FLAGS_FIELD: usize = 2;

/// Total frame header size (length + flags).
///
/// The length field written on the wire includes these six bytes.
pub const FRAME_HEADER_SIZE: usize = SIZE_OF_FRAME_LENGTH_FIELD + SIZE_OF_FRAME_FLAGS_FIELD;

/// First physical fragment of a message.
pub const BEGIN_FRAGMENT_FLAG: u16 = 1 << 15;

/// Last physical fragment of a message.
pub const END_FRAGMENT_FLAG: u16 = 1 << 14;

/// Last frame of a message.
pub const IS_FINAL_FLAG: u16 = 1 << 13;

/// Opens a nested data structure.
pub const BEGIN_DATA_STRUCTURE_FLAG: u16 = 1 << 12;

/// Closes a nested data structure.
pub const END_DATA_STRUCTURE_FLAG: u16 = 1 << 11;

/// Marks an absent (null) value.
pub const IS_NULL_FLAG: u16 = 1 << 10;

/// Marks an event message.
pub const IS_EVENT_FLAG: u16 = 1 << 9;

/// Request expects backup acknowledgements.
pub const BACKUP_AWARE_FLAG: u16 = 1 << 8;

/// Backup acknowledgement event.
pub const BACKUP_EVENT_FLAG: u16 = 1 << 7;

/// Listener registration request.
pub const LISTENER_FLAG: u16 = 1;

/// Flags of the initial frame of a message that was not fragmented.
pub const UNFRAGMENTED_MESSAGE: u16 = BEGIN_FRAGMENT_FLAG | END_FRAGMENT_FLAG;

/// Default frame flags (no special flags set).
pub const DEFAULT_FLAGS: u16 = 0;

/// Size of a byte field.
pub const BYTE_SIZE_IN_BYTES: usize = 1;
/// Size of a boolean field.
pub const BOOLEAN_SIZE_IN_BYTES: usize = 1;
/// Size of a short field.
pub const SHORT_SIZE_IN_BYTES: usize = 2;
/// Size of an int field.
pub const INT_SIZE_IN_BYTES: usize = 4;
/// Size of a long field.
pub const LONG_SIZE_IN_BYTES: usize = 8;
/// Size of a float field.
pub const FLOAT_SIZE_IN_BYTES: usize = 4;
/// Size of a double field.
pub const DOUBLE_SIZE_IN_BYTES: usize = 8;
/// Size of a UUID field: null flag plus two longs.
pub const UUID_SIZE_IN_BYTES: usize = BOOLEAN_SIZE_IN_BYTES + 2 * LONG_SIZE_IN_BYTES;
/// Size of a local date: year int, month byte, day byte.
pub const LOCAL_DATE_SIZE_IN_BYTES: usize = INT_SIZE_IN_BYTES + 2 * BYTE_SIZE_IN_BYTES;
/// Size of a local time: hour, minute, second bytes and nanos int.
pub const LOCAL_TIME_SIZE_IN_BYTES: usize = 3 * BYTE_SIZE_IN_BYTES + INT_SIZE_IN_BYTES;
/// Size of a local date-time.
pub const LOCAL_DATE_TIME_SIZE_IN_BYTES: usize =
    LOCAL_DATE_SIZE_IN_BYTES + LOCAL_TIME_SIZE_IN_BYTES;
/// Size of an offset date-time: local date-time plus offset seconds.
pub const OFFSET_DATE_TIME_SIZE_IN_BYTES: usize = LOCAL_DATE_TIME_SIZE_IN_BYTES + INT_SIZE_IN_BYTES;

/// Offset of message type in initial frame content.
pub const TYPE_FIELD_OFFSET: usize = 0;

/// Offset of correlation ID in initial frame content.
pub const CORRELATION_ID_FIELD_OFFSET: usize = TYPE_FIELD_OFFSET + INT_SIZE_IN_BYTES;

/// Offset of partition ID in request and event initial frames.
pub const PARTITION_ID_FIELD_OFFSET: usize = CORRELATION_ID_FIELD_OFFSET + LONG_SIZE_IN_BYTES;

/// Size of the request initial frame header.
pub const REQUEST_HEADER_SIZE: usize = PARTITION_ID_FIELD_OFFSET + INT_SIZE_IN_BYTES;

/// Offset of backup acks count in response initial frame.
pub const RESPONSE_BACKUP_ACKS_FIELD_OFFSET: usize =
    CORRELATION_ID_FIELD_OFFSET + LONG_SIZE_IN_BYTES;

/// Size of the response initial frame header.
pub const RESPONSE_HEADER_SIZE: usize = RESPONSE_BACKUP_ACKS_FIELD_OFFSET + BYTE_SIZE_IN_BYTES;

/// Size of the event initial frame header.
pub const EVENT_HEADER_SIZE: usize = PARTITION_ID_FIELD_OFFSET + INT_SIZE_IN_BYTES;

/// Offset of the fragmentation id in a fragmentation wrapper frame.
pub const FRAGMENTATION_ID_OFFSET: usize = 0;

/// Partition ID indicating no specific partition (-1).
pub const PARTITION_ID_ANY: i32 = -1;

/// Message type of a server-side exception response.
pub const EXCEPTION_MESSAGE_TYPE: i32 = 0;

/// Protocol preamble a client writes once after connecting.
pub const CLIENT_BINARY_PROTOCOL: &[u8; 3] = b"CP2";

/// Builds a request message type from its service id, operation id and variant.
pub const fn message_type(service_id: u8, operation_id: u8, variant: u8) -> i32 {
    ((service_id as i32) << 16) | ((operation_id as i32) << 8) | variant as i32
}
