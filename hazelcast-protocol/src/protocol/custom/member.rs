use std::collections::HashMap;
use std::fmt;

use uuid::Uuid;

use super::{begin_structure, end_structure, open_structure, Address, AddressCodec};
use crate::error::Result;
use crate::protocol::builtin::{CodecUtil, MapCodec, StringCodec};
use crate::protocol::client_message::{ClientMessage, FrameCursor};
use crate::protocol::fields::FieldWriter;

/// Cluster version of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MemberVersion {
    /// Major version.
    pub major: i8,
    /// Minor version.
    pub minor: i8,
    /// Patch version.
    pub patch: i8,
}

impl fmt::Display for MemberVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Codec for [`MemberVersion`].
pub struct MemberVersionCodec;

impl MemberVersionCodec {
    /// Encodes `version`.
    pub fn encode(msg: &mut ClientMessage, version: &MemberVersion) {
        begin_structure(
            msg,
            FieldWriter::new()
                .byte(version.major)
                .byte(version.minor)
                .byte(version.patch),
        );
        end_structure(msg);
    }

    /// Decodes a version.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<MemberVersion> {
        let mut fields = open_structure(cursor)?;
        let version = MemberVersion {
            major: fields.byte()?,
            minor: fields.byte()?,
            patch: fields.byte()?,
        };
        CodecUtil::fast_forward_to_end_frame(cursor)?;
        Ok(version)
    }
}

/// Names one of a member's network endpoints, such as the client or WAN
/// endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointQualifier {
    /// Protocol type: 0 member, 1 client, 2 WAN, 3 REST, 4 memcache.
    pub qualifier_type: i32,
    /// Optional identifier distinguishing endpoints of the same type.
    pub identifier: Option<String>,
}

/// Codec for [`EndpointQualifier`].
pub struct EndpointQualifierCodec;

impl EndpointQualifierCodec {
    /// Encodes `qualifier`.
    pub fn encode(msg: &mut ClientMessage, qualifier: &EndpointQualifier) {
        begin_structure(msg, FieldWriter::new().int(qualifier.qualifier_type));
        CodecUtil::encode_nullable(msg, qualifier.identifier.as_deref(), StringCodec::encode);
        end_structure(msg);
    }

    /// Decodes a qualifier.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<EndpointQualifier> {
        let mut fields = open_structure(cursor)?;
        let qualifier_type = fields.int()?;
        let identifier = CodecUtil::decode_nullable(cursor, StringCodec::decode)?;
        CodecUtil::fast_forward_to_end_frame(cursor)?;
        Ok(EndpointQualifier {
            qualifier_type,
            identifier,
        })
    }
}

/// A cluster member as announced in membership views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    /// Address the member is reachable at.
    pub address: Address,
    /// Member UUID.
    pub uuid: Uuid,
    /// User-defined member attributes.
    pub attributes: HashMap<String, String>,
    /// Lite members own no partitions.
    pub lite_member: bool,
    /// Codebase version of the member.
    pub version: MemberVersion,
    /// Addresses per endpoint; absent when sent by members that predate
    /// advanced networking.
    pub address_map: Option<HashMap<EndpointQualifier, Address>>,
}

/// Codec for [`MemberInfo`].
pub struct MemberInfoCodec;

impl MemberInfoCodec {
    /// Encodes `member`. The address map is written only when present.
    pub fn encode(msg: &mut ClientMessage, member: &MemberInfo) {
        begin_structure(
            msg,
            FieldWriter::new().uuid(Some(member.uuid)).boolean(member.lite_member),
        );
        AddressCodec::encode(msg, &member.address);
        MapCodec::encode(msg, &member.attributes, |m, k| StringCodec::encode(m, k), |m, v| {
            StringCodec::encode(m, v)
        });
        MemberVersionCodec::encode(msg, &member.version);
        if let Some(address_map) = &member.address_map {
            MapCodec::encode(
                msg,
                address_map,
                EndpointQualifierCodec::encode,
                AddressCodec::encode,
            );
        }
        end_structure(msg);
    }

    /// Decodes a member.
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<MemberInfo> {
        let mut fields = open_structure(cursor)?;
        let uuid = fields.required_uuid("member uuid")?;
        let lite_member = fields.boolean()?;
        let address = AddressCodec::decode(cursor)?;
        let attributes = MapCodec::decode(cursor, StringCodec::decode, StringCodec::decode)?;
        let version = MemberVersionCodec::decode(cursor)?;
        let address_map = if CodecUtil::next_frame_is_data_structure_end_frame(cursor)? {
            None
        } else {
            Some(MapCodec::decode(
                cursor,
                EndpointQualifierCodec::decode,
                AddressCodec::decode,
            )?)
        };
        CodecUtil::fast_forward_to_end_frame(cursor)?;
        Ok(MemberInfo {
            address,
            uuid,
            attributes,
            lite_member,
            version,
            address_map,
        })
    }
}
