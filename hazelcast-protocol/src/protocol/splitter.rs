//! Outbound fragmentation of large messages.

use super::client_message::ClientMessage;
use super::constants::*;
use super::fixed_size;
use super::frame::Frame;

/// Splits `message` into physical fragments of at most `frame_size_limit`
/// wire bytes each.
///
/// Cuts happen only at frame boundaries, so a single frame larger than the
/// limit travels alone in its own fragment. Each fragment starts with a
/// fragmentation frame holding `fragmentation_id`, flagged `BEGIN_FRAGMENT`
/// for the first fragment, `END_FRAGMENT` for the last and no fragment flag
/// in between. A message that fits is returned unchanged.
pub fn split_message(
    message: ClientMessage,
    frame_size_limit: usize,
    fragmentation_id: i64,
) -> Vec<ClientMessage> {
    if message.wire_size() <= frame_size_limit || message.frame_count() < 2 {
        return vec![message];
    }

    let header_size = FRAME_HEADER_SIZE + LONG_SIZE_IN_BYTES;
    let mut fragments: Vec<Vec<Frame>> = Vec::new();
    let mut current = vec![fragmentation_frame(fragmentation_id)];
    let mut current_size = header_size;

    for frame in message.into_frames() {
        let frame_size = frame.wire_size();
        if current.len() > 1 && current_size + frame_size > frame_size_limit {
            fragments.push(std::mem::replace(
                &mut current,
                vec![fragmentation_frame(fragmentation_id)],
            ));
            current_size = header_size;
        }
        current_size += frame_size;
        current.push(frame);
    }
    fragments.push(current);

    tracing::debug!(
        fragmentation_id,
        fragments = fragments.len(),
        "split outbound message"
    );

    let last = fragments.len() - 1;
    fragments
        .into_iter()
        .enumerate()
        .map(|(index, mut frames)| {
            frames[0].flags = match index {
                0 => BEGIN_FRAGMENT_FLAG,
                i if i == last => END_FRAGMENT_FLAG,
                _ => DEFAULT_FLAGS,
            };
            ClientMessage::from_frames(frames)
        })
        .collect()
}

fn fragmentation_frame(fragmentation_id: i64) -> Frame {
    let mut header = Frame::zeroed(LONG_SIZE_IN_BYTES, DEFAULT_FLAGS);
    fixed_size::encode_long(&mut header.content, FRAGMENTATION_ID_OFFSET, fragmentation_id);
    header
}
