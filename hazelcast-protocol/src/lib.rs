//! Frames, codecs and message assembly for the Hazelcast Open Binary
//! Protocol.
//!
//! The [`protocol`] module turns bytes into [`ClientMessage`]s and back, and
//! holds the codecs for built-in types, custom types and individual
//! operations. The [`serialization`] module builds the opaque [`Data`]
//! blobs that messages carry.

#![warn(missing_docs)]

pub mod error;
pub mod protocol;
pub mod serialization;

pub use error::{HazelcastError, Result};
pub use protocol::{ClientMessage, ClientMessageCodec, Frame};
pub use serialization::{Data, FromData, ToData};
