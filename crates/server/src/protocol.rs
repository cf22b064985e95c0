//! JSON wire format spoken over the WebSocket.
//!
//! Every frame is a JSON object tagged by `event`. Client requests carry an
//! optional `requestId` that the matching `ack` echoes; room events are pushed
//! without one.

use battle_core::{BattleSnapshot, LogEntry, Side};
use battle_runtime::{RoomEvent, RoomId, RoomMessage, RuntimeError, StartReceipt, StartRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Requests a client can make.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    Join {
        room_id: RoomId,
    },
    Start {
        room_id: RoomId,
        #[serde(flatten)]
        request: StartRequest,
    },
    /// Action of a human-controlled side. Names are validated by the runtime
    /// so unknown ones are rejected with a precise reason.
    Action {
        room_id: RoomId,
        side: String,
        action: String,
    },
    Stop {
        room_id: RoomId,
    },
    Leave {
        room_id: RoomId,
    },
}

impl ClientMessage {
    pub fn room_id(&self) -> &RoomId {
        match self {
            ClientMessage::Join { room_id }
            | ClientMessage::Start { room_id, .. }
            | ClientMessage::Action { room_id, .. }
            | ClientMessage::Stop { room_id }
            | ClientMessage::Leave { room_id } => room_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClientMessage::Join { .. } => "join",
            ClientMessage::Start { .. } => "start",
            ClientMessage::Action { .. } => "action",
            ClientMessage::Stop { .. } => "stop",
            ClientMessage::Leave { .. } => "leave",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    pub request_id: Option<u64>,
    pub message: ClientMessage,
}

/// Frame that could not be turned into a [`Request`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolViolation {
    /// Echoed when the frame was at least an object with a `requestId`.
    pub request_id: Option<u64>,
    pub message: String,
}

/// Decodes one text frame.
pub fn decode(text: &str) -> Result<Request, ProtocolViolation> {
    let value: Value = serde_json::from_str(text).map_err(|err| ProtocolViolation {
        request_id: None,
        message: err.to_string(),
    })?;
    let request_id = value.get("requestId").and_then(Value::as_u64);

    let message = ClientMessage::deserialize(value).map_err(|err| ProtocolViolation {
        request_id,
        message: err.to_string(),
    })?;
    if message.room_id().as_str().trim().is_empty() {
        return Err(ProtocolViolation {
            request_id,
            message: "roomId must not be empty".to_owned(),
        });
    }

    Ok(Request {
        request_id,
        message,
    })
}

/// Frames pushed to a client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    Ack {
        request_id: Option<u64>,
        ok: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        restarted: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    State {
        room_id: RoomId,
        state: Option<BattleSnapshot>,
    },
    Log {
        room_id: RoomId,
        entry: LogEntry,
    },
    Over {
        room_id: RoomId,
        winner: Side,
        state: BattleSnapshot,
    },
}

impl ServerMessage {
    pub fn accepted(request_id: Option<u64>) -> Self {
        ServerMessage::Ack {
            request_id,
            ok: true,
            seed: None,
            restarted: None,
            reason: None,
            message: None,
        }
    }

    pub fn started(request_id: Option<u64>, receipt: StartReceipt) -> Self {
        ServerMessage::Ack {
            request_id,
            ok: true,
            seed: Some(receipt.seed),
            restarted: Some(receipt.restarted),
            reason: None,
            message: None,
        }
    }

    pub fn rejected(request_id: Option<u64>, error: &RuntimeError) -> Self {
        ServerMessage::Ack {
            request_id,
            ok: false,
            seed: None,
            restarted: None,
            reason: Some(error.kind().to_owned()),
            message: Some(error.to_string()),
        }
    }

    pub fn protocol(violation: ProtocolViolation) -> Self {
        ServerMessage::Ack {
            request_id: violation.request_id,
            ok: false,
            seed: None,
            restarted: None,
            reason: Some("protocol".to_owned()),
            message: Some(violation.message),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<RoomMessage> for ServerMessage {
    fn from(message: RoomMessage) -> Self {
        let room_id = message.room;
        match message.event {
            RoomEvent::State(state) => ServerMessage::State { room_id, state },
            RoomEvent::Log(entry) => ServerMessage::Log { room_id, entry },
            RoomEvent::Over { winner, state } => ServerMessage::Over {
                room_id,
                winner,
                state,
            },
        }
    }
}
