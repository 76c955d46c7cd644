//! Incremental reader that turns inbound bytes into physical messages.

use bytes::BytesMut;

use super::client_message::ClientMessage;
use super::constants::FRAME_HEADER_SIZE;
use super::frame::Frame;
use crate::error::{HazelcastError, Result};

/// Default upper bound for a single inbound frame.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 64 * 1024 * 1024;

/// Reader limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Largest frame accepted, header included.
    pub max_frame_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

/// Accumulates frames until one carrying `IS_FINAL` completes a message.
///
/// Frames are split off the input buffer without copying. The returned
/// message is a physical one; fragments still need to go through the
/// [`FragmentAssembler`](super::FragmentAssembler).
#[derive(Debug, Default)]
pub struct ClientMessageReader {
    config: ReaderConfig,
    pending: Vec<Frame>,
}

impl ClientMessageReader {
    /// Creates a reader with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a reader with the given limits.
    pub fn with_config(config: ReaderConfig) -> Self {
        Self {
            config,
            pending: Vec::new(),
        }
    }

    /// Consumes as many complete frames from `src` as possible.
    ///
    /// Returns `Ok(Some(_))` as soon as a message is complete; remaining bytes
    /// stay in `src` for the next call.
    pub fn read(&mut self, src: &mut BytesMut) -> Result<Option<ClientMessage>> {
        loop {
            if src.len() < FRAME_HEADER_SIZE {
                return Ok(None);
            }

            let frame_length = Frame::peek_length(src)?;
            if frame_length > self.config.max_frame_size {
                tracing::warn!(
                    frame_length,
                    max_frame_size = self.config.max_frame_size,
                    "inbound frame exceeds limit"
                );
                return Err(HazelcastError::Protocol(format!(
                    "frame of {} bytes exceeds maximum of {}",
                    frame_length, self.config.max_frame_size
                )));
            }

            let frame = match Frame::read_from(src)? {
                Some(frame) => frame,
                None => {
                    src.reserve(frame_length - src.len());
                    return Ok(None);
                }
            };

            tracing::trace!(
                frame_length,
                flags = frame.flags,
                pending = self.pending.len(),
                "read frame"
            );

            let is_final = frame.is_final_frame();
            self.pending.push(frame);
            if is_final {
                let frames = std::mem::take(&mut self.pending);
                return Ok(Some(ClientMessage::from_frames(frames)));
            }
        }
    }

    /// Returns the number of frames read for the message in progress.
    pub fn pending_frames(&self) -> usize {
        self.pending.len()
    }
}
