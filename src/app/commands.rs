//! Inbound MQTT messages.
//!
//! The MQTT adapter hands every received `(topic, payload)` pair to
//! [`parse_message`], which turns it into something the
//! [`ControlService`](super::service::ControlService) can act on.  Topic
//! and payload matching is exact: no trimming, no case folding.

use crate::config::TopicConfig;
use crate::door::{DoorEvent, DoorState};

/// Literal payloads accepted on the command topic.
pub const COMMAND_OPEN: &str = "OPEN";
pub const COMMAND_CLOSE: &str = "CLOSE";

/// Remote door command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorCommand {
    Open,
    Close,
}

impl DoorCommand {
    pub fn from_payload(payload: &[u8]) -> Option<Self> {
        match payload {
            p if p == COMMAND_OPEN.as_bytes() => Some(Self::Open),
            p if p == COMMAND_CLOSE.as_bytes() => Some(Self::Close),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => COMMAND_OPEN,
            Self::Close => COMMAND_CLOSE,
        }
    }

    pub fn to_door_event(self) -> DoorEvent {
        match self {
            Self::Open => DoorEvent::CommandOpen,
            Self::Close => DoorEvent::CommandClose,
        }
    }
}

/// Classified inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundMessage {
    Command(DoorCommand),
    /// Our own retained status coming back; `None` if the payload is not a
    /// known state string.
    StatusEcho(Option<DoorState>),
    Ignored,
}

pub fn parse_message(topics: &TopicConfig, topic: &str, payload: &[u8]) -> InboundMessage {
    if topic == topics.command.as_str() {
        DoorCommand::from_payload(payload).map_or(InboundMessage::Ignored, InboundMessage::Command)
    } else if topic == topics.status.as_str() {
        let state = core::str::from_utf8(payload)
            .ok()
            .and_then(DoorState::from_wire);
        InboundMessage::StatusEcho(state)
    } else {
        InboundMessage::Ignored
    }
}
