//! Minimal object serialization for values embedded in protocol messages.
//!
//! The protocol layer treats user objects as opaque [`Data`] blobs. This
//! module provides just enough of Hazelcast's serialization format to build
//! such blobs for built-in types and identified data serializable objects
//! such as predicates.

mod data;
mod data_input;
mod data_output;
mod identified;

pub use data::{
    compute_partition_hash, Data, FromData, ToData, CONSTANT_TYPE_BOOLEAN,
    CONSTANT_TYPE_BYTE_ARRAY, CONSTANT_TYPE_INTEGER, CONSTANT_TYPE_LONG, CONSTANT_TYPE_NULL,
    CONSTANT_TYPE_STRING,
};
pub use data_input::{DataInput, ObjectDataInput};
pub use data_output::{DataOutput, ObjectDataOutput};
pub use identified::{IdentifiedDataSerializable, IDENTIFIED_DATA_SERIALIZABLE_TYPE_ID};
