use uuid::Uuid;

use super::{operation, RequestBuilder, ResponseReader};
use crate::error::{HazelcastError, Result};
use crate::protocol::builtin::{
    CodecUtil, EntryListUUIDListIntegerCodec, ListMultiFrameCodec, ListUUIDCodec, StringCodec,
};
use crate::protocol::client_message::ClientMessage;
use crate::protocol::custom::{
    Address, AddressCodec, MemberInfo, MemberInfoCodec, Schema, SchemaCodec,
};

operation!(
    /// Authenticates a connection with a username and password.
    ClientAuthenticationCodec,
    "Client.Authentication",
    0x000100,
    retryable = true
);

/// Outcome of an authentication attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationStatus {
    /// The connection is authenticated.
    Authenticated,
    /// Wrong cluster name or credentials.
    CredentialsFailed,
    /// The member does not support this client's serialization version.
    SerializationVersionMismatch,
    /// The member does not accept clients, for example during a
    /// blue-green switch.
    NotAllowedInCluster,
}

impl AuthenticationStatus {
    /// Resolves a wire status byte.
    pub fn from_code(code: i8) -> Result<Self> {
        match code {
            0 => Ok(Self::Authenticated),
            1 => Ok(Self::CredentialsFailed),
            2 => Ok(Self::SerializationVersionMismatch),
            3 => Ok(Self::NotAllowedInCluster),
            other => Err(HazelcastError::Protocol(format!(
                "unknown authentication status {}",
                other
            ))),
        }
    }

    /// Returns the wire status byte.
    pub fn code(self) -> i8 {
        match self {
            Self::Authenticated => 0,
            Self::CredentialsFailed => 1,
            Self::SerializationVersionMismatch => 2,
            Self::NotAllowedInCluster => 3,
        }
    }
}

/// Response to [`ClientAuthenticationCodec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResponse {
    /// Authentication outcome.
    pub status: AuthenticationStatus,
    /// Address of the member, present when authenticated.
    pub address: Option<Address>,
    /// UUID of the member.
    pub member_uuid: Option<Uuid>,
    /// Serialization version the member uses.
    pub serialization_version: i8,
    /// Version string of the member.
    pub server_hazelcast_version: String,
    /// Number of partitions in the cluster.
    pub partition_count: i32,
    /// Cluster id.
    pub cluster_id: Option<Uuid>,
    /// Whether the member supports client failover.
    pub failover_supported: bool,
}

impl ClientAuthenticationCodec {
    /// Encodes an authentication request.
    #[allow(clippy::too_many_arguments)]
    pub fn encode_request(
        cluster_name: &str,
        username: Option<&str>,
        password: Option<&str>,
        uuid: Option<Uuid>,
        client_type: &str,
        serialization_version: i8,
        client_hazelcast_version: &str,
        client_name: &str,
        labels: &[String],
    ) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>()
            .uuid(uuid)
            .byte(serialization_version)
            .build();
        StringCodec::encode(&mut msg, cluster_name);
        CodecUtil::encode_nullable(&mut msg, username, StringCodec::encode);
        CodecUtil::encode_nullable(&mut msg, password, StringCodec::encode);
        StringCodec::encode(&mut msg, client_type);
        StringCodec::encode(&mut msg, client_hazelcast_version);
        StringCodec::encode(&mut msg, client_name);
        ListMultiFrameCodec::encode(&mut msg, labels, |m, label| StringCodec::encode(m, label));
        msg
    }

    /// Decodes the authentication response.
    pub fn decode_response(msg: &ClientMessage) -> Result<AuthenticationResponse> {
        let mut reader = ResponseReader::response(msg)?;
        let status = AuthenticationStatus::from_code(reader.fields.byte()?)?;
        let member_uuid = reader.fields.uuid()?;
        let serialization_version = reader.fields.byte()?;
        let partition_count = reader.fields.int()?;
        let cluster_id = reader.fields.uuid()?;
        let failover_supported = reader.fields.boolean()?;
        let address = AddressCodec::decode_nullable(&mut reader.frames)?;
        let server_hazelcast_version = StringCodec::decode(&mut reader.frames)?;
        Ok(AuthenticationResponse {
            status,
            address,
            member_uuid,
            serialization_version,
            server_hazelcast_version,
            partition_count,
            cluster_id,
            failover_supported,
        })
    }
}

operation!(
    /// Subscribes to member list and partition table updates.
    ClientAddClusterViewListenerCodec,
    "Client.AddClusterViewListener",
    0x000300,
    retryable = false
);

/// An event delivered to a cluster view listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterViewEvent {
    /// The current member list.
    MembersView {
        /// Member list version.
        version: i32,
        /// Members in join order.
        members: Vec<MemberInfo>,
    },
    /// The current partition table.
    PartitionsView {
        /// Partition table version.
        version: i32,
        /// Partition ids owned by each member.
        partitions: Vec<(Uuid, Vec<i32>)>,
    },
}

impl ClientAddClusterViewListenerCodec {
    /// Message type of members view events.
    pub const EVENT_MEMBERS_VIEW_TYPE: i32 = 0x000302;
    /// Message type of partitions view events.
    pub const EVENT_PARTITIONS_VIEW_TYPE: i32 = 0x000303;

    /// Encodes the subscription request.
    pub fn encode_request() -> ClientMessage {
        RequestBuilder::for_operation::<Self>().build()
    }

    /// Decodes an event; other event types yield `None`.
    pub fn decode_event(msg: &ClientMessage) -> Result<Option<ClusterViewEvent>> {
        let message_type = msg.message_type()?;
        if message_type == Self::EVENT_MEMBERS_VIEW_TYPE {
            let mut reader = ResponseReader::event(msg)?;
            let version = reader.fields.int()?;
            let members = ListMultiFrameCodec::decode(&mut reader.frames, MemberInfoCodec::decode)?;
            Ok(Some(ClusterViewEvent::MembersView { version, members }))
        } else if message_type == Self::EVENT_PARTITIONS_VIEW_TYPE {
            let mut reader = ResponseReader::event(msg)?;
            let version = reader.fields.int()?;
            let partitions = EntryListUUIDListIntegerCodec::decode(&mut reader.frames)?;
            Ok(Some(ClusterViewEvent::PartitionsView { version, partitions }))
        } else {
            Ok(None)
        }
    }
}

operation!(
    /// Heartbeat; keeps an idle connection alive.
    ClientPingCodec,
    "Client.Ping",
    0x000B00,
    retryable = true
);

impl ClientPingCodec {
    /// Encodes a ping.
    pub fn encode_request() -> ClientMessage {
        RequestBuilder::for_operation::<Self>().build()
    }
}

operation!(
    /// Publishes a compact schema to the cluster.
    ClientSendSchemaCodec,
    "Client.SendSchema",
    0x001300,
    retryable = true
);

impl ClientSendSchemaCodec {
    /// Encodes the request.
    pub fn encode_request(schema: &Schema) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().build();
        SchemaCodec::encode(&mut msg, schema);
        msg
    }

    /// Decodes the members the schema was replicated to.
    pub fn decode_response(msg: &ClientMessage) -> Result<Vec<Uuid>> {
        let mut reader = ResponseReader::response(msg)?;
        ListUUIDCodec::decode(&mut reader.frames)
    }
}

operation!(
    /// Looks up a compact schema by id.
    ClientFetchSchemaCodec,
    "Client.FetchSchema",
    0x001400,
    retryable = true
);

impl ClientFetchSchemaCodec {
    /// Encodes the request.
    pub fn encode_request(schema_id: i64) -> ClientMessage {
        RequestBuilder::for_operation::<Self>().long(schema_id).build()
    }

    /// Decodes the schema, if the cluster knows it.
    pub fn decode_response(msg: &ClientMessage) -> Result<Option<Schema>> {
        let mut reader = ResponseReader::response(msg)?;
        SchemaCodec::decode_nullable(&mut reader.frames)
    }
}
