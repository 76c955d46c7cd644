//! Connections to Hazelcast cluster members.

mod connection;

pub use connection::{Connection, ConnectionId};
