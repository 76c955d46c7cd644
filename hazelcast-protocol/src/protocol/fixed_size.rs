//! Fixed-width field codec.
//!
//! Reads and writes scalar values at byte offsets inside a frame's content.
//! Every multi-byte number is little-endian regardless of the host.
//!
//! Encoders write into buffers that were sized by the caller for exactly the
//! fields they hold. Decoders run on bytes received from the wire and return
//! [`HazelcastError::Protocol`] instead of reading past the end of a frame.

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike,
};
use uuid::Uuid;

use super::constants::*;
use crate::error::{HazelcastError, Result};

fn field<const N: usize>(buf: &[u8], offset: usize) -> Result<[u8; N]> {
    offset
        .checked_add(N)
        .and_then(|end| buf.get(offset..end))
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(|| {
            HazelcastError::Protocol(format!(
                "cannot read {} bytes at offset {} of a {}-byte frame",
                N,
                offset,
                buf.len()
            ))
        })
}

/// Writes a signed byte.
pub fn encode_byte(buf: &mut [u8], offset: usize, value: i8) {
    buf[offset] = value as u8;
}

/// Reads a signed byte.
pub fn decode_byte(buf: &[u8], offset: usize) -> Result<i8> {
    Ok(field::<1>(buf, offset)?[0] as i8)
}

/// Writes a boolean as `0x00` or `0x01`.
pub fn encode_boolean(buf: &mut [u8], offset: usize, value: bool) {
    buf[offset] = u8::from(value);
}

/// Reads a boolean; any non-zero byte is `true`.
pub fn decode_boolean(buf: &[u8], offset: usize) -> Result<bool> {
    Ok(field::<1>(buf, offset)?[0] != 0)
}

/// Writes a 16-bit signed integer.
pub fn encode_short(buf: &mut [u8], offset: usize, value: i16) {
    buf[offset..offset + SHORT_SIZE_IN_BYTES].copy_from_slice(&value.to_le_bytes());
}

/// Reads a 16-bit signed integer.
pub fn decode_short(buf: &[u8], offset: usize) -> Result<i16> {
    Ok(i16::from_le_bytes(field(buf, offset)?))
}

/// Writes a 32-bit signed integer.
pub fn encode_int(buf: &mut [u8], offset: usize, value: i32) {
    buf[offset..offset + INT_SIZE_IN_BYTES].copy_from_slice(&value.to_le_bytes());
}

/// Reads a 32-bit signed integer.
pub fn decode_int(buf: &[u8], offset: usize) -> Result<i32> {
    Ok(i32::from_le_bytes(field(buf, offset)?))
}

/// Writes a 64-bit signed integer.
pub fn encode_long(buf: &mut [u8], offset: usize, value: i64) {
    buf[offset..offset + LONG_SIZE_IN_BYTES].copy_from_slice(&value.to_le_bytes());
}

/// Reads a 64-bit signed integer.
pub fn decode_long(buf: &[u8], offset: usize) -> Result<i64> {
    Ok(i64::from_le_bytes(field(buf, offset)?))
}

/// Writes an IEEE-754 single precision float.
pub fn encode_float(buf: &mut [u8], offset: usize, value: f32) {
    buf[offset..offset + FLOAT_SIZE_IN_BYTES].copy_from_slice(&value.to_le_bytes());
}

/// Reads an IEEE-754 single precision float.
pub fn decode_float(buf: &[u8], offset: usize) -> Result<f32> {
    Ok(f32::from_le_bytes(field(buf, offset)?))
}

/// Writes an IEEE-754 double precision float.
pub fn encode_double(buf: &mut [u8], offset: usize, value: f64) {
    buf[offset..offset + DOUBLE_SIZE_IN_BYTES].copy_from_slice(&value.to_le_bytes());
}

/// Reads an IEEE-754 double precision float.
pub fn decode_double(buf: &[u8], offset: usize) -> Result<f64> {
    Ok(f64::from_le_bytes(field(buf, offset)?))
}

/// Writes a nullable UUID as a null-flag byte followed by the most and least
/// significant halves.
///
/// A `None` value only sets the flag; the 16 value bytes are left as they are.
pub fn encode_uuid(buf: &mut [u8], offset: usize, value: Option<Uuid>) {
    encode_boolean(buf, offset, value.is_none());
    if let Some(uuid) = value {
        let bits = uuid.as_u128();
        encode_long(buf, offset + BOOLEAN_SIZE_IN_BYTES, (bits >> 64) as i64);
        encode_long(
            buf,
            offset + BOOLEAN_SIZE_IN_BYTES + LONG_SIZE_IN_BYTES,
            bits as u64 as i64,
        );
    }
}

/// Reads a nullable UUID.
pub fn decode_uuid(buf: &[u8], offset: usize) -> Result<Option<Uuid>> {
    if decode_boolean(buf, offset)? {
        return Ok(None);
    }
    let msb = decode_long(buf, offset + BOOLEAN_SIZE_IN_BYTES)? as u64;
    let lsb = decode_long(buf, offset + BOOLEAN_SIZE_IN_BYTES + LONG_SIZE_IN_BYTES)? as u64;
    Ok(Some(Uuid::from_u128(((msb as u128) << 64) | lsb as u128)))
}

/// Writes a date as year, month and day.
pub fn encode_local_date(buf: &mut [u8], offset: usize, value: NaiveDate) {
    encode_int(buf, offset, value.year());
    buf[offset + INT_SIZE_IN_BYTES] = value.month() as u8;
    buf[offset + INT_SIZE_IN_BYTES + BYTE_SIZE_IN_BYTES] = value.day() as u8;
}

/// Reads a date written by [`encode_local_date`].
pub fn decode_local_date(buf: &[u8], offset: usize) -> Result<NaiveDate> {
    let year = decode_int(buf, offset)?;
    let month = field::<1>(buf, offset + INT_SIZE_IN_BYTES)?[0];
    let day = field::<1>(buf, offset + INT_SIZE_IN_BYTES + BYTE_SIZE_IN_BYTES)?[0];
    NaiveDate::from_ymd_opt(year, u32::from(month), u32::from(day)).ok_or_else(|| {
        HazelcastError::Serialization(format!("invalid date {}-{}-{}", year, month, day))
    })
}

/// Writes a time of day as hour, minute, second and nanoseconds.
pub fn encode_local_time(buf: &mut [u8], offset: usize, value: NaiveTime) {
    buf[offset] = value.hour() as u8;
    buf[offset + 1] = value.minute() as u8;
    buf[offset + 2] = value.second() as u8;
    encode_int(buf, offset + 3, value.nanosecond() as i32);
}

/// Reads a time of day, truncating nanoseconds to microsecond precision.
pub fn decode_local_time(buf: &[u8], offset: usize) -> Result<NaiveTime> {
    let [hour, minute, second] = field::<3>(buf, offset)?;
    let nanos = decode_int(buf, offset + 3)?;
    let micros = u32::try_from(nanos)
        .map_err(|_| HazelcastError::Serialization(format!("negative nanoseconds {}", nanos)))?
        / 1_000;
    NaiveTime::from_hms_micro_opt(
        u32::from(hour),
        u32::from(minute),
        u32::from(second),
        micros,
    )
    .ok_or_else(|| {
        HazelcastError::Serialization(format!(
            "invalid time {}:{}:{}.{:06}",
            hour, minute, second, micros
        ))
    })
}

/// Writes a date-time as a date followed by a time.
pub fn encode_local_date_time(buf: &mut [u8], offset: usize, value: NaiveDateTime) {
    encode_local_date(buf, offset, value.date());
    encode_local_time(buf, offset + LOCAL_DATE_SIZE_IN_BYTES, value.time());
}

/// Reads a date-time written by [`encode_local_date_time`].
pub fn decode_local_date_time(buf: &[u8], offset: usize) -> Result<NaiveDateTime> {
    let date = decode_local_date(buf, offset)?;
    let time = decode_local_time(buf, offset + LOCAL_DATE_SIZE_IN_BYTES)?;
    Ok(NaiveDateTime::new(date, time))
}

/// Writes a local date-time followed by its UTC offset in seconds.
pub fn encode_offset_date_time(buf: &mut [u8], offset: usize, value: DateTime<FixedOffset>) {
    encode_local_date_time(buf, offset, value.naive_local());
    encode_int(
        buf,
        offset + LOCAL_DATE_TIME_SIZE_IN_BYTES,
        value.offset().local_minus_utc(),
    );
}

/// Reads a date-time with a fixed UTC offset.
pub fn decode_offset_date_time(buf: &[u8], offset: usize) -> Result<DateTime<FixedOffset>> {
    let local = decode_local_date_time(buf, offset)?;
    let offset_seconds = decode_int(buf, offset + LOCAL_DATE_TIME_SIZE_IN_BYTES)?;
    let zone = FixedOffset::east_opt(offset_seconds).ok_or_else(|| {
        HazelcastError::Serialization(format!("invalid UTC offset {}s", offset_seconds))
    })?;
    zone.from_local_datetime(&local).single().ok_or_else(|| {
        HazelcastError::Serialization(format!("ambiguous local time {} at {}", local, zone))
    })
}
