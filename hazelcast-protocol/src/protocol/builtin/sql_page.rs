use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use super::{
    BigDecimalCodec, CodecUtil, DataCodec, HazelcastJsonValue, HazelcastJsonValueCodec,
    ListCNFixedSizeCodec, ListIntegerCodec, ListMultiFrameCodec, StringCodec,
};
use crate::error::{HazelcastError, Result};
use crate::protocol::client_message::{ClientMessage, FrameCursor};
use crate::protocol::constants::*;
use crate::protocol::fixed_size;
use crate::protocol::frame::Frame;
use crate::serialization::Data;

/// SQL column types, with their wire ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum SqlColumnType {
    /// Strings.
    Varchar = 0,
    /// Booleans.
    Boolean = 1,
    /// 8-bit integers.
    TinyInt = 2,
    /// 16-bit integers.
    SmallInt = 3,
    /// 32-bit integers.
    Integer = 4,
    /// 64-bit integers.
    BigInt = 5,
    /// Arbitrary-precision decimals.
    Decimal = 6,
    /// 32-bit floats.
    Real = 7,
    /// 64-bit floats.
    Double = 8,
    /// Dates without a zone.
    Date = 9,
    /// Times without a zone.
    Time = 10,
    /// Date-times without a zone.
    Timestamp = 11,
    /// Date-times with a UTC offset.
    TimestampWithTimeZone = 12,
    /// Serialized objects.
    Object = 13,
    /// The type of the `NULL` literal.
    Null = 14,
    /// JSON documents.
    Json = 15,
}

impl SqlColumnType {
    /// Returns the wire id.
    pub fn id(self) -> i32 {
        self as i32
    }

    /// Resolves a wire id.
    pub fn from_id(id: i32) -> Result<Self> {
        Ok(match id {
            0 => Self::Varchar,
            1 => Self::Boolean,
            2 => Self::TinyInt,
            3 => Self::SmallInt,
            4 => Self::Integer,
            5 => Self::BigInt,
            6 => Self::Decimal,
            7 => Self::Real,
            8 => Self::Double,
            9 => Self::Date,
            10 => Self::Time,
            11 => Self::Timestamp,
            12 => Self::TimestampWithTimeZone,
            13 => Self::Object,
            14 => Self::Null,
            15 => Self::Json,
            other => {
                return Err(HazelcastError::Serialization(format!(
                    "unknown SQL column type id {}",
                    other
                )))
            }
        })
    }
}

/// One column of a page, holding a value (or null) for every row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlColumn {
    /// VARCHAR values.
    Varchar(Vec<Option<String>>),
    /// BOOLEAN values.
    Boolean(Vec<Option<bool>>),
    /// TINYINT values.
    TinyInt(Vec<Option<i8>>),
    /// SMALLINT values.
    SmallInt(Vec<Option<i16>>),
    /// INTEGER values.
    Integer(Vec<Option<i32>>),
    /// BIGINT values.
    BigInt(Vec<Option<i64>>),
    /// DECIMAL values.
    Decimal(Vec<Option<Decimal>>),
    /// REAL values.
    Real(Vec<Option<f32>>),
    /// DOUBLE values.
    Double(Vec<Option<f64>>),
    /// DATE values.
    Date(Vec<Option<NaiveDate>>),
    /// TIME values.
    Time(Vec<Option<NaiveTime>>),
    /// TIMESTAMP values.
    Timestamp(Vec<Option<NaiveDateTime>>),
    /// TIMESTAMP WITH TIME ZONE values.
    TimestampWithTimeZone(Vec<Option<DateTime<FixedOffset>>>),
    /// OBJECT values, still serialized.
    Object(Vec<Option<Data>>),
    /// A column of the NULL type; only the row count travels.
    Null(usize),
    /// JSON values.
    Json(Vec<Option<HazelcastJsonValue>>),
}

impl SqlColumn {
    /// Returns the column's type.
    pub fn column_type(&self) -> SqlColumnType {
        match self {
            Self::Varchar(_) => SqlColumnType::Varchar,
            Self::Boolean(_) => SqlColumnType::Boolean,
            Self::TinyInt(_) => SqlColumnType::TinyInt,
            Self::SmallInt(_) => SqlColumnType::SmallInt,
            Self::Integer(_) => SqlColumnType::Integer,
            Self::BigInt(_) => SqlColumnType::BigInt,
            Self::Decimal(_) => SqlColumnType::Decimal,
            Self::Real(_) => SqlColumnType::Real,
            Self::Double(_) => SqlColumnType::Double,
            Self::Date(_) => SqlColumnType::Date,
            Self::Time(_) => SqlColumnType::Time,
            Self::Timestamp(_) => SqlColumnType::Timestamp,
            Self::TimestampWithTimeZone(_) => SqlColumnType::TimestampWithTimeZone,
            Self::Object(_) => SqlColumnType::Object,
            Self::Null(_) => SqlColumnType::Null,
            Self::Json(_) => SqlColumnType::Json,
        }
    }

    /// Number of rows in the column.
    pub fn len(&self) -> usize {
        match self {
            Self::Varchar(v) => v.len(),
            Self::Boolean(v) => v.len(),
            Self::TinyInt(v) => v.len(),
            Self::SmallInt(v) => v.len(),
            Self::Integer(v) => v.len(),
            Self::BigInt(v) => v.len(),
            Self::Decimal(v) => v.len(),
            Self::Real(v) => v.len(),
            Self::Double(v) => v.len(),
            Self::Date(v) => v.len(),
            Self::Time(v) => v.len(),
            Self::Timestamp(v) => v.len(),
            Self::TimestampWithTimeZone(v) => v.len(),
            Self::Object(v) => v.len(),
            Self::Null(rows) => *rows,
            Self::Json(v) => v.len(),
        }
    }

    /// Returns true if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A page of SQL rows stored column by column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SqlPage {
    /// Columns in select-list order.
    pub columns: Vec<SqlColumn>,
    /// True if no more pages follow.
    pub is_last: bool,
}

impl SqlPage {
    /// Creates a page.
    pub fn new(columns: Vec<SqlColumn>, is_last: bool) -> Self {
        Self { columns, is_last }
    }

    /// Number of rows, taken from the first column.
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, SqlColumn::len)
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Column-oriented SQL pages.
pub struct SqlPageCodec;

impl SqlPageCodec {
    /// Encodes `page` as a data structure.
    pub fn encode(msg: &mut ClientMessage, page: &SqlPage) {
        msg.add_frame(Frame::new_begin_frame());

        let mut is_last = Frame::zeroed(BOOLEAN_SIZE_IN_BYTES, DEFAULT_FLAGS);
        fixed_size::encode_boolean(&mut is_last.content, 0, page.is_last);
        msg.add_frame(is_last);

        let type_ids: Vec<i32> = page.columns.iter().map(|c| c.column_type().id()).collect();
        ListIntegerCodec::encode(msg, &type_ids);

        for column in &page.columns {
            match column {
                SqlColumn::Varchar(v) => ListMultiFrameCodec::encode_contains_nullable(
                    msg,
                    v.iter().map(Option::as_deref),
                    StringCodec::encode,
                ),
                SqlColumn::Decimal(v) => ListMultiFrameCodec::encode_contains_nullable(
                    msg,
                    v.iter().map(Option::as_ref),
                    BigDecimalCodec::encode,
                ),
                SqlColumn::Object(v) => ListMultiFrameCodec::encode_contains_nullable(
                    msg,
                    v.iter().map(Option::as_ref),
                    DataCodec::encode,
                ),
                SqlColumn::Json(v) => ListMultiFrameCodec::encode_contains_nullable(
                    msg,
                    v.iter().map(Option::as_ref),
                    HazelcastJsonValueCodec::encode,
                ),
                SqlColumn::Null(rows) => {
                    let mut frame = Frame::zeroed(INT_SIZE_IN_BYTES, DEFAULT_FLAGS);
                    fixed_size::encode_int(&mut frame.content, 0, *rows as i32);
                    msg.add_frame(frame);
                }
                SqlColumn::Boolean(v) => ListCNFixedSizeCodec::encode(msg, v),
                SqlColumn::TinyInt(v) => ListCNFixedSizeCodec::encode(msg, v),
                SqlColumn::SmallInt(v) => ListCNFixedSizeCodec::encode(msg, v),
                SqlColumn::Integer(v) => ListCNFixedSizeCodec::encode(msg, v),
                SqlColumn::BigInt(v) => ListCNFixedSizeCodec::encode(msg, v),
                SqlColumn::Real(v) => ListCNFixedSizeCodec::encode(msg, v),
                SqlColumn::Double(v) => ListCNFixedSizeCodec::encode(msg, v),
                SqlColumn::Date(v) => ListCNFixedSizeCodec::encode(msg, v),
                SqlColumn::Time(v) => ListCNFixedSizeCodec::encode(msg, v),
                SqlColumn::Timestamp(v) => ListCNFixedSizeCodec::encode(msg, v),
                SqlColumn::TimestampWithTimeZone(v) => ListCNFixedSizeCodec::encode(msg, v),
            }
        }

        msg.add_frame(Frame::new_end_frame());
    }

    /// Decodes a page, skipping any trailing fields.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<SqlPage> {
        cursor.next()?;

        let is_last = fixed_size::decode_boolean(&cursor.next()?.content, 0)?;
        let type_ids = ListIntegerCodec::decode(cursor)?;

        let mut columns = Vec::with_capacity(type_ids.len());
        for type_id in type_ids {
            let column = match SqlColumnType::from_id(type_id)? {
                SqlColumnType::Varchar => SqlColumn::Varchar(
                    ListMultiFrameCodec::decode_contains_nullable(cursor, StringCodec::decode)?,
                ),
                SqlColumnType::Decimal => SqlColumn::Decimal(
                    ListMultiFrameCodec::decode_contains_nullable(cursor, BigDecimalCodec::decode)?,
                ),
                SqlColumnType::Object => SqlColumn::Object(
                    ListMultiFrameCodec::decode_contains_nullable(cursor, DataCodec::decode)?,
                ),
                SqlColumnType::Json => SqlColumn::Json(
                    ListMultiFrameCodec::decode_contains_nullable(
                        cursor,
                        HazelcastJsonValueCodec::decode,
                    )?,
                ),
                SqlColumnType::Null => {
                    let rows = fixed_size::decode_int(&cursor.next()?.content, 0)?;
                    let rows = usize::try_from(rows).map_err(|_| {
                        HazelcastError::Protocol(format!("invalid NULL column size {}", rows))
                    })?;
                    SqlColumn::Null(rows)
                }
                SqlColumnType::Boolean => SqlColumn::Boolean(ListCNFixedSizeCodec::decode(cursor)?),
                SqlColumnType::TinyInt => SqlColumn::TinyInt(ListCNFixedSizeCodec::decode(cursor)?),
                SqlColumnType::SmallInt => {
                    SqlColumn::SmallInt(ListCNFixedSizeCodec::decode(cursor)?)
                }
                SqlColumnType::Integer => SqlColumn::Integer(ListCNFixedSizeCodec::decode(cursor)?),
                SqlColumnType::BigInt => SqlColumn::BigInt(ListCNFixedSizeCodec::decode(cursor)?),
                SqlColumnType::Real => SqlColumn::Real(ListCNFixedSizeCodec::decode(cursor)?),
                SqlColumnType::Double => SqlColumn::Double(ListCNFixedSizeCodec::decode(cursor)?),
                SqlColumnType::Date => SqlColumn::Date(ListCNFixedSizeCodec::decode(cursor)?),
                SqlColumnType::Time => SqlColumn::Time(ListCNFixedSizeCodec::decode(cursor)?),
                SqlColumnType::Timestamp => {
                    SqlColumn::Timestamp(ListCNFixedSizeCodec::decode(cursor)?)
                }
                SqlColumnType::TimestampWithTimeZone => {
                    SqlColumn::TimestampWithTimeZone(ListCNFixedSizeCodec::decode(cursor)?)
                }
            };
            columns.push(column);
        }

        CodecUtil::fast_forward_to_end_frame(cursor)?;
        Ok(SqlPage { columns, is_last })
    }

    /// Decodes a page or a null frame.
    pub fn decode_nullable(cursor: &mut FrameCursor<'_>) -> Result<Option<SqlPage>> {
        CodecUtil::decode_nullable(cursor, Self::decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn roundtrip(page: &SqlPage) -> SqlPage {
        let mut msg = ClientMessage::new();
        SqlPageCodec::encode(&mut msg, page);
        msg.add_frame(Frame::from_slice(b"after"));

        let mut cursor = msg.cursor();
        let decoded = SqlPageCodec::decode(&mut cursor).unwrap();
        assert_eq!(&cursor.next().unwrap().content[..], b"after");
        decoded
    }

    #[test]
    fn test_every_column_type() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let time = NaiveTime::from_hms_micro_opt(23, 59, 58, 123_456).unwrap();
        let offset = FixedOffset::east_opt(3600).unwrap();
        let page = SqlPage::new(
            vec![
                SqlColumn::Varchar(vec![Some("a".into()), None]),
                SqlColumn::Boolean(vec![Some(true), None]),
                SqlColumn::TinyInt(vec![Some(-1), Some(127)]),
                SqlColumn::SmallInt(vec![None, Some(300)]),
                SqlColumn::Integer(vec![Some(1), Some(2)]),
                SqlColumn::BigInt(vec![Some(i64::MAX), None]),
                SqlColumn::Decimal(vec![Some(Decimal::from_str("12.5").unwrap()), None]),
                SqlColumn::Real(vec![Some(1.5), None]),
                SqlColumn::Double(vec![None, Some(-0.25)]),
                SqlColumn::Date(vec![Some(date), None]),
                SqlColumn::Time(vec![Some(time), None]),
                SqlColumn::Timestamp(vec![None, Some(date.and_time(time))]),
                SqlColumn::TimestampWithTimeZone(vec![
                    Some(date.and_time(time).and_local_timezone(offset).unwrap()),
                    None,
                ]),
                SqlColumn::Object(vec![None, Some(Data::from_parts(-7, &[0, 0, 0, 9]))]),
                SqlColumn::Null(2),
                SqlColumn::Json(vec![Some(HazelcastJsonValue::new("[1]")), None]),
            ],
            true,
        );

        let decoded = roundtrip(&page);
        assert_eq!(decoded, page);
        assert_eq!(decoded.row_count(), 2);
        assert_eq!(decoded.column_count(), 16);
    }

    #[test]
    fn test_type_ids_are_written_in_column_order() {
        let page = SqlPage::new(vec![SqlColumn::Json(vec![]), SqlColumn::Varchar(vec![])], false);
        let mut msg = ClientMessage::new();
        SqlPageCodec::encode(&mut msg, &page);

        let frames = msg.frames();
        assert!(frames[0].is_begin_frame());
        assert_eq!(&frames[1].content[..], &[0]);
        assert_eq!(&frames[2].content[..], &[15, 0, 0, 0, 0, 0, 0, 0]);
        assert!(frames.last().unwrap().is_end_frame());
        assert!(!roundtrip(&page).is_last);
    }

    #[test]
    fn test_unknown_column_type_is_serialization_error() {
        let mut msg = ClientMessage::new();
        msg.add_frame(Frame::new_begin_frame());
        msg.add_frame(Frame::from_slice(&[1]));
        ListIntegerCodec::encode(&mut msg, &[42]);
        msg.add_frame(Frame::new_end_frame());

        assert!(matches!(
            SqlPageCodec::decode(&mut msg.cursor()),
            Err(HazelcastError::Serialization(_))
        ));
    }

    #[test]
    fn test_column_type_ids() {
        for id in 0..16 {
            assert_eq!(SqlColumnType::from_id(id).unwrap().id(), id);
        }
        assert!(SqlColumnType::from_id(16).is_err());
        assert!(SqlColumnType::from_id(-1).is_err());
    }
}
