use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use super::ListMultiFrameCodec;
use crate::error::{HazelcastError, Result};
use crate::protocol::client_message::{ClientMessage, FrameCursor};
use crate::protocol::constants::*;
use crate::protocol::fixed_size;
use crate::protocol::frame::Frame;

/// A value with a fixed wire width, packable back-to-back in one frame.
pub trait FixedSizeType: Sized {
    /// Encoded width in bytes.
    const SIZE: usize;

    /// Writes `value` at `offset`.
    fn encode_at(buf: &mut [u8], offset: usize, value: &Self);

    /// Reads a value at `offset`.
    fn decode_at(buf: &[u8], offset: usize) -> Result<Self>;
}

macro_rules! fixed_size_type {
    ($ty:ty, $size:expr, $encode:path, $decode:path) => {
        impl FixedSizeType for $ty {
            const SIZE: usize = $size;

            fn encode_at(buf: &mut [u8], offset: usize, value: &Self) {
                $encode(buf, offset, *value);
            }

            fn decode_at(buf: &[u8], offset: usize) -> Result<Self> {
                $decode(buf, offset)
            }
        }
    };
}

fixed_size_type!(
    bool,
    BOOLEAN_SIZE_IN_BYTES,
    fixed_size::encode_boolean,
    fixed_size::decode_boolean
);
fixed_size_type!(i8, BYTE_SIZE_IN_BYTES, fixed_size::encode_byte, fixed_size::decode_byte);
fixed_size_type!(i16, SHORT_SIZE_IN_BYTES, fixed_size::encode_short, fixed_size::decode_short);
fixed_size_type!(i32, INT_SIZE_IN_BYTES, fixed_size::encode_int, fixed_size::decode_int);
fixed_size_type!(i64, LONG_SIZE_IN_BYTES, fixed_size::encode_long, fixed_size::decode_long);
fixed_size_type!(f32, FLOAT_SIZE_IN_BYTES, fixed_size::encode_float, fixed_size::decode_float);
fixed_size_type!(f64, DOUBLE_SIZE_IN_BYTES, fixed_size::encode_double, fixed_size::decode_double);
fixed_size_type!(
    NaiveDate,
    LOCAL_DATE_SIZE_IN_BYTES,
    fixed_size::encode_local_date,
    fixed_size::decode_local_date
);
fixed_size_type!(
    NaiveTime,
    LOCAL_TIME_SIZE_IN_BYTES,
    fixed_size::encode_local_time,
    fixed_size::decode_local_time
);
fixed_size_type!(
    NaiveDateTime,
    LOCAL_DATE_TIME_SIZE_IN_BYTES,
    fixed_size::encode_local_date_time,
    fixed_size::decode_local_date_time
);
fixed_size_type!(
    DateTime<FixedOffset>,
    OFFSET_DATE_TIME_SIZE_IN_BYTES,
    fixed_size::encode_offset_date_time,
    fixed_size::decode_offset_date_time
);

/// UUIDs inside packed lists are never null.
impl FixedSizeType for Uuid {
    const SIZE: usize = UUID_SIZE_IN_BYTES;

    fn encode_at(buf: &mut [u8], offset: usize, value: &Self) {
        fixed_size::encode_uuid(buf, offset, Some(*value));
    }

    fn decode_at(buf: &[u8], offset: usize) -> Result<Self> {
        fixed_size::decode_uuid(buf, offset)?
            .ok_or_else(|| HazelcastError::Protocol("null UUID in packed list".to_string()))
    }
}

fn item_count(frame: &Frame, item_size: usize) -> Result<usize> {
    let len = frame.content.len();
    if len % item_size != 0 {
        return Err(HazelcastError::Protocol(format!(
            "frame of {} bytes is not a whole number of {}-byte items",
            len, item_size
        )));
    }
    Ok(len / item_size)
}

/// Homogeneous fixed-size items packed into a single frame.
pub struct FixedSizeListCodec;

impl FixedSizeListCodec {
    /// Appends one frame holding all `items`.
    pub fn encode<T: FixedSizeType>(msg: &mut ClientMessage, items: &[T]) {
        let mut frame = Frame::zeroed(items.len() * T::SIZE, DEFAULT_FLAGS);
        for (i, item) in items.iter().enumerate() {
            T::encode_at(&mut frame.content, i * T::SIZE, item);
        }
        msg.add_frame(frame);
    }

    /// Decodes the next frame as a packed list.
    pub fn decode<T: FixedSizeType>(cursor: &mut FrameCursor<'_>) -> Result<Vec<T>> {
        let frame = cursor.next()?;
        (0..item_count(frame, T::SIZE)?)
            .map(|i| T::decode_at(&frame.content, i * T::SIZE))
            .collect()
    }
}

/// Pairs of fixed-size keys and values packed into a single frame.
pub struct FixedSizeEntryListCodec;

impl FixedSizeEntryListCodec {
    /// Appends one frame holding all `entries`.
    pub fn encode<K: FixedSizeType, V: FixedSizeType>(msg: &mut ClientMessage, entries: &[(K, V)]) {
        let entry_size = K::SIZE + V::SIZE;
        let mut frame = Frame::zeroed(entries.len() * entry_size, DEFAULT_FLAGS);
        for (i, (key, value)) in entries.iter().enumerate() {
            let offset = i * entry_size;
            K::encode_at(&mut frame.content, offset, key);
            V::encode_at(&mut frame.content, offset + K::SIZE, value);
        }
        msg.add_frame(frame);
    }

    /// Decodes the next frame as packed entries.
    pub fn decode<K: FixedSizeType, V: FixedSizeType>(
        cursor: &mut FrameCursor<'_>,
    ) -> Result<Vec<(K, V)>> {
        let entry_size = K::SIZE + V::SIZE;
        let frame = cursor.next()?;
        (0..item_count(frame, entry_size)?)
            .map(|i| {
                let offset = i * entry_size;
                Ok((
                    K::decode_at(&frame.content, offset)?,
                    V::decode_at(&frame.content, offset + K::SIZE)?,
                ))
            })
            .collect()
    }
}

macro_rules! packed_list_codec {
    ($(#[$doc:meta])* $name:ident, $ty:ty) => {
        $(#[$doc])*
        pub struct $name;

        impl $name {
            /// Appends one frame holding all items.
            pub fn encode(msg: &mut ClientMessage, items: &[$ty]) {
                FixedSizeListCodec::encode(msg, items);
            }

            /// Decodes the next frame.
            pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<Vec<$ty>> {
                FixedSizeListCodec::decode(cursor)
            }
        }
    };
}

macro_rules! packed_entry_list_codec {
    ($(#[$doc:meta])* $name:ident, $key:ty, $value:ty) => {
        $(#[$doc])*
        pub struct $name;

        impl $name {
            /// Appends one frame holding all entries.
            pub fn encode(msg: &mut ClientMessage, entries: &[($key, $value)]) {
                FixedSizeEntryListCodec::encode(msg, entries);
            }

            /// Decodes the next frame.
            pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<Vec<($key, $value)>> {
                FixedSizeEntryListCodec::decode(cursor)
            }
        }
    };
}

packed_list_codec!(
    /// Lists of i32.
    ListIntegerCodec,
    i32
);
packed_list_codec!(
    /// Lists of i64.
    ListLongCodec,
    i64
);
packed_list_codec!(
    /// Lists of UUIDs.
    ListUUIDCodec,
    Uuid
);
packed_list_codec!(
    /// Arrays of i64.
    LongArrayCodec,
    i64
);
packed_list_codec!(
    /// Arrays of f32.
    FloatArrayCodec,
    f32
);
packed_entry_list_codec!(
    /// UUID to i64 entries, as used for CRDT replica timestamps.
    EntryListUUIDLongCodec,
    Uuid,
    i64
);
packed_entry_list_codec!(
    /// i32 to i32 entries.
    EntryListIntegerIntegerCodec,
    i32,
    i32
);
packed_entry_list_codec!(
    /// i32 to i64 entries.
    EntryListIntegerLongCodec,
    i32,
    i64
);
packed_entry_list_codec!(
    /// i32 to UUID entries.
    EntryListIntegerUUIDCodec,
    i32,
    Uuid
);

impl LongArrayCodec {
    /// Decodes a long array or a null frame.
    pub fn decode_nullable(cursor: &mut FrameCursor<'_>) -> Result<Option<Vec<i64>>> {
        super::CodecUtil::decode_nullable(cursor, Self::decode)
    }
}

impl FloatArrayCodec {
    /// Decodes a float array or a null frame.
    pub fn decode_nullable(cursor: &mut FrameCursor<'_>) -> Result<Option<Vec<f32>>> {
        super::CodecUtil::decode_nullable(cursor, Self::decode)
    }
}

/// UUID keys each owning a list of i32, e.g. partition ids per member.
///
/// Wire shape: a multi-frame list of int lists, followed by one packed UUID
/// list holding the keys in the same order.
pub struct EntryListUUIDListIntegerCodec;

impl EntryListUUIDListIntegerCodec {
    /// Encodes the entries.
    pub fn encode(msg: &mut ClientMessage, entries: &[(Uuid, Vec<i32>)]) {
        ListMultiFrameCodec::encode(msg, entries, |m, (_, values)| {
            ListIntegerCodec::encode(m, values)
        });
        let keys: Vec<Uuid> = entries.iter().map(|(key, _)| *key).collect();
        ListUUIDCodec::encode(msg, &keys);
    }

    /// Decodes the entries.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<Vec<(Uuid, Vec<i32>)>> {
        let values = ListMultiFrameCodec::decode(cursor, ListIntegerCodec::decode)?;
        let keys = ListUUIDCodec::decode(cursor)?;
        if keys.len() != values.len() {
            return Err(HazelcastError::Protocol(format!(
                "{} keys for {} value lists",
                keys.len(),
                values.len()
            )));
        }
        Ok(keys.into_iter().zip(values).collect())
    }
}

const TYPE_NULL_ONLY: u8 = 1;
const TYPE_NOT_NULL_ONLY: u8 = 2;
const TYPE_MIXED: u8 = 3;
const ITEMS_PER_BITMASK: usize = 8;
const LIST_CN_HEADER_SIZE: usize = BYTE_SIZE_IN_BYTES + INT_SIZE_IN_BYTES;
/// Largest all-null list accepted. Such lists carry no items, so the frame
/// length puts no bound on their count.
pub const MAX_NULL_ONLY_COUNT: usize = 1 << 20;

/// Fixed-size items that may be null, packed into a single frame.
///
/// Layout: type byte, i32 count, then the items. All-null lists carry no
/// items; lists without nulls carry them back-to-back; mixed lists carry
/// groups of one presence bitmask byte followed by the present items of up
/// to eight slots.
pub struct ListCNFixedSizeCodec;

impl ListCNFixedSizeCodec {
    /// Appends one frame holding `items`.
    pub fn encode<T: FixedSizeType>(msg: &mut ClientMessage, items: &[Option<T>]) {
        let present = items.iter().filter(|item| item.is_some()).count();
        let count = items.len();

        let (kind, size) = if present == 0 {
            (TYPE_NULL_ONLY, LIST_CN_HEADER_SIZE)
        } else if present == count {
            (TYPE_NOT_NULL_ONLY, LIST_CN_HEADER_SIZE + count * T::SIZE)
        } else {
            let bitmasks = (count + ITEMS_PER_BITMASK - 1) / ITEMS_PER_BITMASK;
            (TYPE_MIXED, LIST_CN_HEADER_SIZE + bitmasks + present * T::SIZE)
        };

        let mut frame = Frame::zeroed(size, DEFAULT_FLAGS);
        frame.content[0] = kind;
        fixed_size::encode_int(&mut frame.content, BYTE_SIZE_IN_BYTES, count as i32);

        let mut position = LIST_CN_HEADER_SIZE;
        match kind {
            TYPE_NOT_NULL_ONLY => {
                for item in items.iter().flatten() {
                    T::encode_at(&mut frame.content, position, item);
                    position += T::SIZE;
                }
            }
            TYPE_MIXED => {
                for group in items.chunks(ITEMS_PER_BITMASK) {
                    let bitmask_position = position;
                    position += 1;
                    let mut bitmask = 0u8;
                    for (slot, item) in group.iter().enumerate() {
                        if let Some(item) = item {
                            bitmask |= 1 << slot;
                            T::encode_at(&mut frame.content, position, item);
                            position += T::SIZE;
                        }
                    }
                    frame.content[bitmask_position] = bitmask;
                }
            }
            _ => {}
        }
        msg.add_frame(frame);
    }

    /// Decodes the next frame.
    pub fn decode<T: FixedSizeType>(cursor: &mut FrameCursor<'_>) -> Result<Vec<Option<T>>> {
        let content = &cursor.next()?.content;
        let kind = fixed_size::decode_byte(content, 0)? as u8;
        let count = fixed_size::decode_int(content, BYTE_SIZE_IN_BYTES)?;
        let count = usize::try_from(count)
            .map_err(|_| HazelcastError::Protocol(format!("invalid list count {}", count)))?;

        let mut result = Vec::with_capacity(count.min(content.len()));
        let mut position = LIST_CN_HEADER_SIZE;
        match kind {
            TYPE_NULL_ONLY => {
                if count > MAX_NULL_ONLY_COUNT {
                    return Err(HazelcastError::Protocol(format!(
                        "null-only list count {} exceeds {}",
                        count, MAX_NULL_ONLY_COUNT
                    )));
                }
                result.try_reserve_exact(count).map_err(|e| {
                    HazelcastError::Protocol(format!("cannot allocate {} list items: {}", count, e))
                })?;
                result.resize_with(count, || None);
            }
            TYPE_NOT_NULL_ONLY => {
                for _ in 0..count {
                    result.push(Some(T::decode_at(content, position)?));
                    position += T::SIZE;
                }
            }
            TYPE_MIXED => {
                while result.len() < count {
                    let bitmask = fixed_size::decode_byte(content, position)? as u8;
                    position += 1;
                    for slot in 0..ITEMS_PER_BITMASK {
                        if result.len() == count {
                            break;
                        }
                        if bitmask & (1 << slot) != 0 {
                            result.push(Some(T::decode_at(content, position)?));
                            position += T::SIZE;
                        } else {
                            result.push(None);
                        }
                    }
                }
            }
            other => {
                return Err(HazelcastError::Protocol(format!(
                    "unknown nullable list type {}",
                    other
                )))
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip_cn<T: FixedSizeType + Clone>(items: &[Option<T>]) -> Vec<Option<T>> {
        let mut msg = ClientMessage::new();
        ListCNFixedSizeCodec::encode(&mut msg, items);
        ListCNFixedSizeCodec::decode(&mut msg.cursor()).unwrap()
    }

    #[test]
    fn test_integer_list() {
        let mut msg = ClientMessage::new();
        ListIntegerCodec::encode(&mut msg, &[1, -2, 3]);
        assert_eq!(msg.frames()[0].content.len(), 12);
        assert_eq!(ListIntegerCodec::decode(&mut msg.cursor()).unwrap(), vec![1, -2, 3]);
    }

    #[test]
    fn test_long_and_float_arrays() {
        let mut msg = ClientMessage::new();
        ListLongCodec::encode(&mut msg, &[i64::MIN, 0, i64::MAX]);
        FloatArrayCodec::encode(&mut msg, &[0.5, -1.25]);
        msg.add_frame(Frame::new_null_frame());

        let mut cursor = msg.cursor();
        assert_eq!(ListLongCodec::decode(&mut cursor).unwrap(), vec![i64::MIN, 0, i64::MAX]);
        assert_eq!(
            FloatArrayCodec::decode_nullable(&mut cursor).unwrap(),
            Some(vec![0.5, -1.25])
        );
        assert_eq!(LongArrayCodec::decode_nullable(&mut cursor).unwrap(), None);
    }

    #[test]
    fn test_uuid_list() {
        let ids = vec![Uuid::from_u128(1), Uuid::from_u128(u128::MAX)];
        let mut msg = ClientMessage::new();
        ListUUIDCodec::encode(&mut msg, &ids);
        assert_eq!(msg.frames()[0].content.len(), 34);
        assert_eq!(ListUUIDCodec::decode(&mut msg.cursor()).unwrap(), ids);
    }

    #[test]
    fn test_null_uuid_in_packed_list_is_error() {
        let msg = ClientMessage::from_frame(Frame::from_slice(&[1u8; UUID_SIZE_IN_BYTES]));
        assert!(ListUUIDCodec::decode(&mut msg.cursor()).is_err());
    }

    #[test]
    fn test_uuid_long_entry_list() {
        let entries = vec![(Uuid::from_u128(7), 100i64), (Uuid::from_u128(8), -1)];
        let mut msg = ClientMessage::new();
        EntryListUUIDLongCodec::encode(&mut msg, &entries);
        assert_eq!(msg.frames()[0].content.len(), 2 * 25);
        assert_eq!(EntryListUUIDLongCodec::decode(&mut msg.cursor()).unwrap(), entries);
    }

    #[test]
    fn test_integer_entry_lists() {
        let mut msg = ClientMessage::new();
        EntryListIntegerIntegerCodec::encode(&mut msg, &[(1, 2), (3, 4)]);
        EntryListIntegerLongCodec::encode(&mut msg, &[(5, 6)]);
        EntryListIntegerUUIDCodec::encode(&mut msg, &[(9, Uuid::from_u128(42))]);

        let mut cursor = msg.cursor();
        assert_eq!(
            EntryListIntegerIntegerCodec::decode(&mut cursor).unwrap(),
            vec![(1, 2), (3, 4)]
        );
        assert_eq!(EntryListIntegerLongCodec::decode(&mut cursor).unwrap(), vec![(5, 6)]);
        assert_eq!(
            EntryListIntegerUUIDCodec::decode(&mut cursor).unwrap(),
            vec![(9, Uuid::from_u128(42))]
        );
    }

    #[test]
    fn test_uuid_list_integer_entry_list() {
        let entries = vec![
            (Uuid::from_u128(1), vec![0, 1, 2]),
            (Uuid::from_u128(2), vec![]),
        ];
        let mut msg = ClientMessage::new();
        EntryListUUIDListIntegerCodec::encode(&mut msg, &entries);
        assert_eq!(EntryListUUIDListIntegerCodec::decode(&mut msg.cursor()).unwrap(), entries);
    }

    #[test]
    fn test_ragged_frame_is_protocol_error() {
        let msg = ClientMessage::from_frame(Frame::from_slice(&[0; 5]));
        assert!(matches!(
            ListIntegerCodec::decode(&mut msg.cursor()),
            Err(HazelcastError::Protocol(_))
        ));
    }

    #[test]
    fn test_cn_nulls_at_both_ends() {
        let mut items: Vec<Option<i32>> = (0..10).map(Some).collect();
        items[0] = None;
        items[9] = None;

        let mut msg = ClientMessage::new();
        ListCNFixedSizeCodec::encode(&mut msg, &items);
        let content = &msg.frames()[0].content;
        assert_eq!(content[0], TYPE_MIXED);
        // two bitmask groups, eight present ints
        assert_eq!(content.len(), 5 + 2 + 8 * 4);
        assert_eq!(content[5], 0b1111_1110);

        let decoded = ListCNFixedSizeCodec::decode::<i32>(&mut msg.cursor()).unwrap();
        assert_eq!(decoded, items);
    }

    #[test]
    fn test_cn_bitmask_boundaries() {
        for len in [9usize, 16, 17] {
            let items: Vec<Option<i64>> = (0..len)
                .map(|i| if i % 3 == 1 { None } else { Some(i as i64 * 1000) })
                .collect();
            assert_eq!(roundtrip_cn(&items), items);
        }
    }

    #[test]
    fn test_cn_null_only_and_not_null_only() {
        let nulls: Vec<Option<bool>> = vec![None; 4];
        let mut msg = ClientMessage::new();
        ListCNFixedSizeCodec::encode(&mut msg, &nulls);
        assert_eq!(&msg.frames()[0].content[..], &[TYPE_NULL_ONLY, 4, 0, 0, 0]);
        assert_eq!(roundtrip_cn(&nulls), nulls);

        let full: Vec<Option<i16>> = vec![Some(1), Some(-1)];
        let mut msg = ClientMessage::new();
        ListCNFixedSizeCodec::encode(&mut msg, &full);
        assert_eq!(
            &msg.frames()[0].content[..],
            &[TYPE_NOT_NULL_ONLY, 2, 0, 0, 0, 1, 0, 0xFF, 0xFF]
        );
        assert_eq!(roundtrip_cn(&full), full);

        let empty: Vec<Option<f64>> = Vec::new();
        assert_eq!(roundtrip_cn(&empty), empty);
    }

    #[test]
    fn test_cn_temporal_items() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let items = vec![Some(date), None, Some(NaiveDate::from_ymd_opt(1, 1, 1).unwrap())];
        assert_eq!(roundtrip_cn(&items), items);
    }

    #[test]
    fn test_cn_unknown_type_is_error() {
        let msg = ClientMessage::from_frame(Frame::from_slice(&[9, 0, 0, 0, 0]));
        assert!(ListCNFixedSizeCodec::decode::<i32>(&mut msg.cursor()).is_err());
    }

    #[test]
    fn test_cn_null_only_huge_count_is_protocol_error() {
        let msg = ClientMessage::from_frame(Frame::from_slice(&[1, 0xFF, 0xFF, 0xFF, 0x7F]));
        let err = ListCNFixedSizeCodec::decode::<i64>(&mut msg.cursor()).unwrap_err();
        assert!(matches!(err, HazelcastError::Protocol(_)));

        let limit = (MAX_NULL_ONLY_COUNT as i32).to_le_bytes();
        let msg = ClientMessage::from_frame(Frame::from_slice(&[
            1, limit[0], limit[1], limit[2], limit[3],
        ]));
        let decoded = ListCNFixedSizeCodec::decode::<i64>(&mut msg.cursor()).unwrap();
        assert_eq!(decoded.len(), MAX_NULL_ONLY_COUNT);
        assert!(decoded.iter().all(Option::is_none));
    }

    #[test]
    fn test_cn_huge_count_with_short_content_is_protocol_error() {
        let not_null = ClientMessage::from_frame(Frame::from_slice(&[2, 0xFF, 0xFF, 0xFF, 0x7F]));
        let err = ListCNFixedSizeCodec::decode::<i32>(&mut not_null.cursor()).unwrap_err();
        assert!(matches!(err, HazelcastError::Protocol(_)));

        let mixed = ClientMessage::from_frame(Frame::from_slice(&[3, 0xFF, 0xFF, 0xFF, 0x7F, 0]));
        let err = ListCNFixedSizeCodec::decode::<i32>(&mut mixed.cursor()).unwrap_err();
        assert!(matches!(err, HazelcastError::Protocol(_)));
    }
}
