use bytes::BytesMut;
use rust_decimal::Decimal;

use crate::error::{HazelcastError, Result};
use crate::protocol::client_message::{ClientMessage, FrameCursor};
use crate::protocol::constants::INT_SIZE_IN_BYTES;
use crate::protocol::fixed_size;
use crate::protocol::frame::Frame;
use crate::serialization::Data;

/// UTF-8 strings, one frame each, with no length prefix beyond the frame's.
pub struct StringCodec;

impl StringCodec {
    /// Appends a frame holding `value`.
    pub fn encode(msg: &mut ClientMessage, value: &str) {
        msg.add_frame(Frame::from_slice(value.as_bytes()));
    }

    /// Decodes the next frame as a string.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<String> {
        Self::decode_frame(cursor.next()?)
    }

    /// Decodes the content of `frame` as a string.
    pub fn decode_frame(frame: &Frame) -> Result<String> {
        std::str::from_utf8(&frame.content)
            .map(str::to_owned)
            .map_err(|e| {
                HazelcastError::Serialization(format!("invalid UTF-8 in string frame: {}", e))
            })
    }
}

/// Raw byte arrays, one frame each.
pub struct ByteArrayCodec;

impl ByteArrayCodec {
    /// Appends a frame holding `value`.
    pub fn encode(msg: &mut ClientMessage, value: &[u8]) {
        msg.add_frame(Frame::from_slice(value));
    }

    /// Decodes the next frame as a byte array.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<Vec<u8>> {
        Ok(cursor.next()?.content.to_vec())
    }
}

/// Opaque serialized objects, carried verbatim as a frame's content.
pub struct DataCodec;

impl DataCodec {
    /// Appends a frame holding the serialized bytes of `value`.
    pub fn encode(msg: &mut ClientMessage, value: &Data) {
        msg.add_frame(Frame::from_slice(value.as_bytes()));
    }

    /// Appends `value` or a null frame.
    pub fn encode_nullable(msg: &mut ClientMessage, value: Option<&Data>) {
        super::CodecUtil::encode_nullable(msg, value, Self::encode);
    }

    /// Decodes the next frame as a `Data` blob.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<Data> {
        let frame = cursor.next()?;
        Ok(Data::new(BytesMut::from(&frame.content[..]).freeze()))
    }

    /// Decodes a `Data` blob or a null frame.
    pub fn decode_nullable(cursor: &mut FrameCursor<'_>) -> Result<Option<Data>> {
        super::CodecUtil::decode_nullable(cursor, Self::decode)
    }
}

/// A JSON document stored as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HazelcastJsonValue(String);

impl HazelcastJsonValue {
    /// Wraps a JSON string without validating it.
    pub fn new(json: impl Into<String>) -> Self {
        Self(json.into())
    }

    /// Returns the JSON text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the JSON text, consuming the value.
    pub fn into_string(self) -> String {
        self.0
    }
}

/// JSON values, encoded as string frames.
pub struct HazelcastJsonValueCodec;

impl HazelcastJsonValueCodec {
    /// Appends a frame holding the JSON text.
    pub fn encode(msg: &mut ClientMessage, value: &HazelcastJsonValue) {
        StringCodec::encode(msg, value.as_str());
    }

    /// Decodes the next frame as JSON text.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<HazelcastJsonValue> {
        StringCodec::decode(cursor).map(HazelcastJsonValue)
    }
}

/// Arbitrary-precision decimals.
///
/// Frame layout: i32 length, big-endian two's-complement unscaled value,
/// i32 scale. Values are held in a `Decimal`, so unscaled values wider than
/// 96 bits or scales above 28 are rejected on decode.
pub struct BigDecimalCodec;

impl BigDecimalCodec {
    /// Appends a frame holding `value`.
    pub fn encode(msg: &mut ClientMessage, value: &Decimal) {
        let unscaled = minimal_twos_complement(value.mantissa());
        let len = unscaled.len();
        let mut frame = Frame::zeroed(2 * INT_SIZE_IN_BYTES + len, 0);
        fixed_size::encode_int(&mut frame.content, 0, len as i32);
        frame.content[INT_SIZE_IN_BYTES..INT_SIZE_IN_BYTES + len].copy_from_slice(&unscaled);
        fixed_size::encode_int(&mut frame.content, INT_SIZE_IN_BYTES + len, value.scale() as i32);
        msg.add_frame(frame);
    }

    /// Decodes the next frame as a decimal.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<Decimal> {
        let content = &cursor.next()?.content;
        let len = fixed_size::decode_int(content, 0)?;
        let len = usize::try_from(len)
            .map_err(|_| HazelcastError::Protocol(format!("invalid decimal length {}", len)))?;
        let unscaled = content
            .get(INT_SIZE_IN_BYTES..INT_SIZE_IN_BYTES + len)
            .ok_or_else(|| HazelcastError::Protocol("decimal frame too short".to_string()))?;
        let scale = fixed_size::decode_int(content, INT_SIZE_IN_BYTES + len)?;

        if unscaled.is_empty() || unscaled.len() > 16 {
            return Err(HazelcastError::Serialization(format!(
                "unsupported decimal width of {} bytes",
                unscaled.len()
            )));
        }
        let fill = if unscaled[0] & 0x80 != 0 { 0xFF } else { 0x00 };
        let mut wide = [fill; 16];
        wide[16 - unscaled.len()..].copy_from_slice(unscaled);
        let mantissa = i128::from_be_bytes(wide);

        let out_of_range = || {
            HazelcastError::Serialization(format!("decimal {}e-{} out of range", mantissa, scale))
        };
        if scale >= 0 {
            Decimal::try_from_i128_with_scale(mantissa, scale as u32).map_err(|_| out_of_range())
        } else {
            let mut value =
                Decimal::try_from_i128_with_scale(mantissa, 0).map_err(|_| out_of_range())?;
            for _ in 0..scale.unsigned_abs() {
                value = value.checked_mul(Decimal::TEN).ok_or_else(out_of_range)?;
            }
            Ok(value)
        }
    }
}

/// Shortest big-endian two's-complement representation, as produced by
/// `BigInteger.toByteArray()`.
fn minimal_twos_complement(value: i128) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    while start < bytes.len() - 1 {
        let redundant = (bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
            || (bytes[start] == 0xFF && bytes[start + 1] & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    bytes[start..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_string_roundtrip_multibyte() {
        let values = ["", "hello", "ünïcödé", "日本語", "\u{1F600} astral \u{10348}"];
        let mut msg = ClientMessage::new();
        for v in values {
            StringCodec::encode(&mut msg, v);
        }

        let mut cursor = msg.cursor();
        for v in values {
            assert_eq!(StringCodec::decode(&mut cursor).unwrap(), v);
        }
    }

    #[test]
    fn test_string_frame_has_no_length_prefix() {
        let mut msg = ClientMessage::new();
        StringCodec::encode(&mut msg, "dev");
        assert_eq!(&msg.frames()[0].content[..], b"dev");
    }

    #[test]
    fn test_invalid_utf8_is_serialization_error() {
        let msg = ClientMessage::from_frame(Frame::from_slice(&[0xC3, 0x28]));
        assert!(matches!(
            StringCodec::decode(&mut msg.cursor()),
            Err(HazelcastError::Serialization(_))
        ));
    }

    #[test]
    fn test_data_and_bytes() {
        let data = Data::from_parts(-7, &[0, 0, 0, 1]);
        let mut msg = ClientMessage::new();
        DataCodec::encode(&mut msg, &data);
        DataCodec::encode_nullable(&mut msg, None);
        ByteArrayCodec::encode(&mut msg, &[1, 2, 3]);

        let mut cursor = msg.cursor();
        assert_eq!(DataCodec::decode(&mut cursor).unwrap(), data);
        assert_eq!(DataCodec::decode_nullable(&mut cursor).unwrap(), None);
        assert_eq!(ByteArrayCodec::decode(&mut cursor).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_json_value() {
        let mut msg = ClientMessage::new();
        HazelcastJsonValueCodec::encode(&mut msg, &HazelcastJsonValue::new("{\"a\":1}"));
        let value = HazelcastJsonValueCodec::decode(&mut msg.cursor()).unwrap();
        assert_eq!(value.as_str(), "{\"a\":1}");
    }

    #[test]
    fn test_big_decimal_layout() {
        let mut msg = ClientMessage::new();
        BigDecimalCodec::encode(&mut msg, &Decimal::from_str("1.28").unwrap());
        // unscaled 128 needs a leading zero byte to stay positive
        assert_eq!(&msg.frames()[0].content[..], &[2, 0, 0, 0, 0x00, 0x80, 2, 0, 0, 0]);
    }

    #[test]
    fn test_big_decimal_roundtrip() {
        for text in ["0", "-1", "123.456", "-98765.4321", "79228162514264337593543950335"] {
            let value = Decimal::from_str(text).unwrap();
            let mut msg = ClientMessage::new();
            BigDecimalCodec::encode(&mut msg, &value);
            assert_eq!(BigDecimalCodec::decode(&mut msg.cursor()).unwrap(), value);
        }
    }

    #[test]
    fn test_big_decimal_negative_scale() {
        // 5 * 10^2
        let msg =
            ClientMessage::from_frame(Frame::from_slice(&[1, 0, 0, 0, 5, 0xFE, 0xFF, 0xFF, 0xFF]));
        assert_eq!(BigDecimalCodec::decode(&mut msg.cursor()).unwrap(), Decimal::from(500));
    }

    #[test]
    fn test_minimal_twos_complement() {
        assert_eq!(minimal_twos_complement(0), vec![0]);
        assert_eq!(minimal_twos_complement(127), vec![0x7F]);
        assert_eq!(minimal_twos_complement(128), vec![0x00, 0x80]);
        assert_eq!(minimal_twos_complement(-1), vec![0xFF]);
        assert_eq!(minimal_twos_complement(-129), vec![0xFF, 0x7F]);
    }
}
