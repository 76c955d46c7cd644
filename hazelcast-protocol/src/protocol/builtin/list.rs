use std::collections::HashMap;
use std::hash::Hash;

use super::CodecUtil;
use crate::error::Result;
use crate::protocol::client_message::{ClientMessage, FrameCursor};
use crate::protocol::frame::Frame;

/// Lists of variable-size items, each item framed by its own codec, between
/// BEGIN and END frames.
pub struct ListMultiFrameCodec;

impl ListMultiFrameCodec {
    /// Encodes every item with `encoder`.
    pub fn encode<I, F>(msg: &mut ClientMessage, items: I, mut encoder: F)
    where
        I: IntoIterator,
        F: FnMut(&mut ClientMessage, I::Item),
    {
        msg.add_frame(Frame::new_begin_frame());
        for item in items {
            encoder(msg, item);
        }
        msg.add_frame(Frame::new_end_frame());
    }

    /// Encodes items that may be absent; absent items become null frames.
    pub fn encode_contains_nullable<I, T, F>(msg: &mut ClientMessage, items: I, mut encoder: F)
    where
        I: IntoIterator<Item = Option<T>>,
        F: FnMut(&mut ClientMessage, T),
    {
        msg.add_frame(Frame::new_begin_frame());
        for item in items {
            match item {
                Some(item) => encoder(msg, item),
                None => msg.add_frame(Frame::new_null_frame()),
            }
        }
        msg.add_frame(Frame::new_end_frame());
    }

    /// Encodes a list that may itself be absent.
    pub fn encode_nullable<I, F>(msg: &mut ClientMessage, items: Option<I>, encoder: F)
    where
        I: IntoIterator,
        F: FnMut(&mut ClientMessage, I::Item),
    {
        match items {
            Some(items) => Self::encode(msg, items, encoder),
            None => msg.add_frame(Frame::new_null_frame()),
        }
    }

    /// Decodes items with `decoder` until the END frame.
    pub fn decode<'a, T, F>(cursor: &mut FrameCursor<'a>, mut decoder: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut FrameCursor<'a>) -> Result<T>,
    {
        let mut result = Vec::new();
        cursor.next()?;
        while !CodecUtil::next_frame_is_data_structure_end_frame(cursor)? {
            result.push(decoder(cursor)?);
        }
        cursor.next()?;
        Ok(result)
    }

    /// Decodes items, mapping null frames to `None`.
    pub fn decode_contains_nullable<'a, T, F>(
        cursor: &mut FrameCursor<'a>,
        mut decoder: F,
    ) -> Result<Vec<Option<T>>>
    where
        F: FnMut(&mut FrameCursor<'a>) -> Result<T>,
    {
        let mut result = Vec::new();
        cursor.next()?;
        while !CodecUtil::next_frame_is_data_structure_end_frame(cursor)? {
            if CodecUtil::next_frame_is_null_frame(cursor)? {
                result.push(None);
            } else {
                result.push(Some(decoder(cursor)?));
            }
        }
        cursor.next()?;
        Ok(result)
    }

    /// Decodes a list that may itself be absent.
    pub fn decode_nullable<'a, T, F>(
        cursor: &mut FrameCursor<'a>,
        decoder: F,
    ) -> Result<Option<Vec<T>>>
    where
        F: FnMut(&mut FrameCursor<'a>) -> Result<T>,
    {
        CodecUtil::decode_nullable(cursor, |c| Self::decode(c, decoder))
    }
}

/// Lists of key/value pairs, keys and values interleaved between BEGIN and
/// END frames.
pub struct EntryListCodec;

impl EntryListCodec {
    /// Encodes each entry as key frames followed by value frames.
    pub fn encode<I, K, V, FK, FV>(
        msg: &mut ClientMessage,
        entries: I,
        mut key_encoder: FK,
        mut value_encoder: FV,
    ) where
        I: IntoIterator<Item = (K, V)>,
        FK: FnMut(&mut ClientMessage, K),
        FV: FnMut(&mut ClientMessage, V),
    {
        msg.add_frame(Frame::new_begin_frame());
        for (key, value) in entries {
            key_encoder(msg, key);
            value_encoder(msg, value);
        }
        msg.add_frame(Frame::new_end_frame());
    }

    /// Encodes an entry list that may be absent.
    pub fn encode_nullable<I, K, V, FK, FV>(
        msg: &mut ClientMessage,
        entries: Option<I>,
        key_encoder: FK,
        value_encoder: FV,
    ) where
        I: IntoIterator<Item = (K, V)>,
        FK: FnMut(&mut ClientMessage, K),
        FV: FnMut(&mut ClientMessage, V),
    {
        match entries {
            Some(entries) => Self::encode(msg, entries, key_encoder, value_encoder),
            None => msg.add_frame(Frame::new_null_frame()),
        }
    }

    /// Decodes entries in wire order.
    pub fn decode<'a, K, V, FK, FV>(
        cursor: &mut FrameCursor<'a>,
        mut key_decoder: FK,
        mut value_decoder: FV,
    ) -> Result<Vec<(K, V)>>
    where
        FK: FnMut(&mut FrameCursor<'a>) -> Result<K>,
        FV: FnMut(&mut FrameCursor<'a>) -> Result<V>,
    {
        let mut result = Vec::new();
        cursor.next()?;
        while !CodecUtil::next_frame_is_data_structure_end_frame(cursor)? {
            let key = key_decoder(cursor)?;
            let value = value_decoder(cursor)?;
            result.push((key, value));
        }
        cursor.next()?;
        Ok(result)
    }

    /// Decodes an entry list that may be absent.
    pub fn decode_nullable<'a, K, V, FK, FV>(
        cursor: &mut FrameCursor<'a>,
        key_decoder: FK,
        value_decoder: FV,
    ) -> Result<Option<Vec<(K, V)>>>
    where
        FK: FnMut(&mut FrameCursor<'a>) -> Result<K>,
        FV: FnMut(&mut FrameCursor<'a>) -> Result<V>,
    {
        CodecUtil::decode_nullable(cursor, |c| Self::decode(c, key_decoder, value_decoder))
    }
}

/// Maps, with the same wire shape as an entry list.
pub struct MapCodec;

impl MapCodec {
    /// Encodes the map's entries in iteration order.
    pub fn encode<'m, K, V, FK, FV>(
        msg: &mut ClientMessage,
        map: &'m HashMap<K, V>,
        key_encoder: FK,
        value_encoder: FV,
    ) where
        FK: FnMut(&mut ClientMessage, &'m K),
        FV: FnMut(&mut ClientMessage, &'m V),
    {
        EntryListCodec::encode(msg, map.iter(), key_encoder, value_encoder);
    }

    /// Encodes a map that may be absent.
    pub fn encode_nullable<'m, K, V, FK, FV>(
        msg: &mut ClientMessage,
        map: Option<&'m HashMap<K, V>>,
        key_encoder: FK,
        value_encoder: FV,
    ) where
        FK: FnMut(&mut ClientMessage, &'m K),
        FV: FnMut(&mut ClientMessage, &'m V),
    {
        match map {
            Some(map) => Self::encode(msg, map, key_encoder, value_encoder),
            None => msg.add_frame(Frame::new_null_frame()),
        }
    }

    /// Decodes into a map; a repeated key keeps the last value.
    pub fn decode<'a, K, V, FK, FV>(
        cursor: &mut FrameCursor<'a>,
        key_decoder: FK,
        value_decoder: FV,
    ) -> Result<HashMap<K, V>>
    where
        K: Eq + Hash,
        FK: FnMut(&mut FrameCursor<'a>) -> Result<K>,
        FV: FnMut(&mut FrameCursor<'a>) -> Result<V>,
    {
        Ok(EntryListCodec::decode(cursor, key_decoder, value_decoder)?
            .into_iter()
            .collect())
    }

    /// Decodes a map that may be absent.
    pub fn decode_nullable<'a, K, V, FK, FV>(
        cursor: &mut FrameCursor<'a>,
        key_decoder: FK,
        value_decoder: FV,
    ) -> Result<Option<HashMap<K, V>>>
    where
        K: Eq + Hash,
        FK: FnMut(&mut FrameCursor<'a>) -> Result<K>,
        FV: FnMut(&mut FrameCursor<'a>) -> Result<V>,
    {
        CodecUtil::decode_nullable(cursor, |c| Self::decode(c, key_decoder, value_decoder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::builtin::{ListIntegerCodec, StringCodec};

    fn strings(msg: &mut ClientMessage, items: &[&str]) {
        ListMultiFrameCodec::encode(msg, items, |m, s| StringCodec::encode(m, s));
    }

    #[test]
    fn test_list_empty_singleton_multi() {
        for items in [&[][..], &["a"][..], &["a", "b", "c"][..]] {
            let mut msg = ClientMessage::new();
            strings(&mut msg, items);
            assert_eq!(msg.frame_count(), items.len() + 2);

            let decoded =
                ListMultiFrameCodec::decode(&mut msg.cursor(), StringCodec::decode).unwrap();
            assert_eq!(decoded, items);
        }
    }

    #[test]
    fn test_list_contains_nullable() {
        let items = vec![Some("x"), None, Some("z")];
        let mut msg = ClientMessage::new();
        ListMultiFrameCodec::encode_contains_nullable(&mut msg, items.clone(), StringCodec::encode);

        let decoded =
            ListMultiFrameCodec::decode_contains_nullable(&mut msg.cursor(), StringCodec::decode)
                .unwrap();
        assert_eq!(decoded, vec![Some("x".to_string()), None, Some("z".to_string())]);
    }

    #[test]
    fn test_nullable_list() {
        let mut msg = ClientMessage::new();
        ListMultiFrameCodec::encode_nullable(&mut msg, None::<Vec<&str>>, |m, s| {
            StringCodec::encode(m, s)
        });
        ListMultiFrameCodec::encode_nullable(&mut msg, Some(vec!["q"]), |m, s| {
            StringCodec::encode(m, s)
        });

        let mut cursor = msg.cursor();
        assert_eq!(
            ListMultiFrameCodec::decode_nullable(&mut cursor, StringCodec::decode).unwrap(),
            None
        );
        assert_eq!(
            ListMultiFrameCodec::decode_nullable(&mut cursor, StringCodec::decode).unwrap(),
            Some(vec!["q".to_string()])
        );
    }

    #[test]
    fn test_entry_list_preserves_order() {
        let entries = vec![("b", "2"), ("a", "1"), ("b", "3")];
        let mut msg = ClientMessage::new();
        EntryListCodec::encode(&mut msg, entries.clone(), StringCodec::encode, StringCodec::encode);

        let decoded =
            EntryListCodec::decode(&mut msg.cursor(), StringCodec::decode, StringCodec::decode)
                .unwrap();
        let expected: Vec<(String, String)> = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_map_roundtrip() {
        let mut map = HashMap::new();
        map.insert("k1".to_string(), "v1".to_string());
        map.insert("k2".to_string(), "v2".to_string());

        let mut msg = ClientMessage::new();
        MapCodec::encode(
            &mut msg,
            &map,
            |m, k| StringCodec::encode(m, k),
            |m, v| StringCodec::encode(m, v),
        );
        MapCodec::encode_nullable(
            &mut msg,
            None::<&HashMap<String, String>>,
            |m, k| StringCodec::encode(m, k),
            |m, v| StringCodec::encode(m, v),
        );

        let mut cursor = msg.cursor();
        let decoded =
            MapCodec::decode(&mut cursor, StringCodec::decode, StringCodec::decode).unwrap();
        assert_eq!(decoded, map);
        let absent =
            MapCodec::decode_nullable(&mut cursor, StringCodec::decode, StringCodec::decode);
        assert!(absent.unwrap().is_none());
    }

    #[test]
    fn test_three_levels_of_nesting() {
        // list of entries whose values are lists of int lists
        let mut msg = ClientMessage::new();
        let outer = vec![("a", vec![vec![1, 2], vec![3]]), ("b", vec![])];
        EntryListCodec::encode(
            &mut msg,
            outer.iter().map(|(k, v)| (k, v)),
            |m, k| StringCodec::encode(m, k),
            |m, v| ListMultiFrameCodec::encode(m, v, |m, ints| ListIntegerCodec::encode(m, ints)),
        );
        msg.add_frame(Frame::from_slice(b"tail"));

        let begins = msg.frames().iter().filter(|f| f.is_begin_frame()).count();
        let ends = msg.frames().iter().filter(|f| f.is_end_frame()).count();
        assert_eq!(begins, ends);

        let mut cursor = msg.cursor();
        cursor.next().unwrap();
        CodecUtil::fast_forward_to_end_frame(&mut cursor).unwrap();
        assert_eq!(&cursor.next().unwrap().content[..], b"tail");

        let decoded = EntryListCodec::decode(&mut msg.cursor(), StringCodec::decode, |c| {
            ListMultiFrameCodec::decode(c, ListIntegerCodec::decode)
        })
        .unwrap();
        assert_eq!(decoded[0].1, vec![vec![1, 2], vec![3]]);
        assert!(decoded[1].1.is_empty());
    }
}
