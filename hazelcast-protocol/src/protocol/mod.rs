//! Hazelcast Open Binary Protocol implementation.
//!
//! A message is a sequence of frames. The first frame carries the message
//! header and the operation's fixed-size fields; the following frames carry
//! variable-size fields, with nested structures bracketed by BEGIN and END
//! frames. Large messages may be split into fragments that are reassembled
//! on receipt.

pub mod builtin;
mod client_message;
mod codec;
pub mod codecs;
pub mod constants;
pub mod custom;
pub mod fields;
pub mod fixed_size;
mod fragmentation;
mod frame;
mod reader;
mod splitter;
mod writer;

pub use client_message::{ClientMessage, FrameCursor};
pub use codec::ClientMessageCodec;
pub use constants::*;
pub use fragmentation::{ClientMessageDecoder, FragmentAssembler};
pub use frame::Frame;
pub use reader::{ClientMessageReader, ReaderConfig, DEFAULT_MAX_FRAME_SIZE};
pub use splitter::split_message;
pub use writer::{encode_message, write_message};
