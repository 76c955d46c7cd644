//! Client-side plumbing for the [Hazelcast](https://hazelcast.com/) Open Binary
//! Protocol.
//!
//! The codecs and the wire format live in [`hazelcast_protocol`]. This crate
//! adds the pieces that sit directly on top of them:
//!
//! - [`Connection`]: one TCP (or any async stream) connection to a member.
//!   It writes the `CP2` preamble, serializes outbound messages under a lock
//!   and runs a reader task that reassembles fragmented inbound messages.
//! - [`query`]: predicates in the identified serializable format the members
//!   expect, including the stateful [`PagingPredicate`](query::PagingPredicate).
//!
//! Invocation, retries, cluster membership and data structure proxies are
//! not part of this crate; callers build a request with a codec, send it
//! over a [`Connection`] and match responses by correlation id.
//!
//! # Example
//!
//! ```rust,no_run
//! use hazelcast_client::{Connection, ConnectionConfig};
//! use hazelcast_protocol::protocol::codecs::MapGetCodec;
//! use hazelcast_protocol::ToData;
//!
//! # async fn run() -> hazelcast_protocol::Result<()> {
//! let config = ConnectionConfig::builder()
//!     .address("127.0.0.1:5701".parse().unwrap())
//!     .build()?;
//! let connection = Connection::connect(&config, |response| {
//!     println!("received {:?}", response.correlation_id());
//! })
//! .await?;
//!
//! let mut request = MapGetCodec::encode_request("my-map", &"key".to_data()?, 1);
//! request.set_correlation_id(connection.next_correlation_id())?;
//! connection.send(&request).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod connection;
pub mod query;

pub use config::{ConfigError, ConnectionConfig, ConnectionConfigBuilder};
pub use connection::{Connection, ConnectionId};
pub use query::{PagingPredicate, Predicate, Predicates};
