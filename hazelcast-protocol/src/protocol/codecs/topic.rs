use uuid::Uuid;

use super::{operation, RequestBuilder, ResponseReader};
use crate::error::Result;
use crate::protocol::builtin::{DataCodec, StringCodec};
use crate::protocol::client_message::ClientMessage;
use crate::serialization::Data;

operation!(
    /// Publishes a message to a topic.
    TopicPublishCodec,
    "Topic.Publish",
    0x040100,
    retryable = false
);

impl TopicPublishCodec {
    /// Encodes the request.
    pub fn encode_request(name: &str, message: &Data) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().build();
        StringCodec::encode(&mut msg, name);
        DataCodec::encode(&mut msg, message);
        msg
    }
}

operation!(
    /// Subscribes to the messages of a topic.
    TopicAddMessageListenerCodec,
    "Topic.AddMessageListener",
    0x040200,
    retryable = false
);

/// A message delivered to a topic listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMessageEvent {
    /// Serialized message.
    pub item: Data,
    /// Publish time, epoch millis.
    pub publish_time: i64,
    /// Member that published the message, if known.
    pub member_uuid: Option<Uuid>,
}

impl TopicAddMessageListenerCodec {
    /// Message type of topic events.
    pub const EVENT_TOPIC_TYPE: i32 = 0x040202;

    /// Encodes the request. With `local_only` set, only messages published
    /// on the connected member are delivered.
    pub fn encode_request(name: &str, local_only: bool) -> ClientMessage {
        let mut msg = RequestBuilder::for_operation::<Self>().boolean(local_only).build();
        StringCodec::encode(&mut msg, name);
        msg
    }

    /// Decodes the registration id.
    pub fn decode_response(msg: &ClientMessage) -> Result<Uuid> {
        ResponseReader::response(msg)?.fields.required_uuid("registration id")
    }

    /// Decodes a topic event; other event types yield `None`.
    pub fn decode_event(msg: &ClientMessage) -> Result<Option<TopicMessageEvent>> {
        if msg.message_type()? != Self::EVENT_TOPIC_TYPE {
            return Ok(None);
        }
        let mut reader = ResponseReader::event(msg)?;
        let publish_time = reader.fields.long()?;
        let member_uuid = reader.fields.uuid()?;
        let item = DataCodec::decode(&mut reader.frames)?;
        Ok(Some(TopicMessageEvent {
            item,
            publish_time,
            member_uuid,
        }))
    }
}
