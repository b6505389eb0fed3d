use crate::model::connection::ConnectionId;
use crate::model::description::Payload;
use crate::model::room::JoinRequest;
use serde::{Deserialize, Serialize};

/// Frames a client sends to the relay.
///
/// On the wire every frame is `{"event": <name>, "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "room:join")]
    RoomJoin(JoinRequest),

    #[serde(rename = "user:call", rename_all = "camelCase")]
    UserCall { to_user: ConnectionId, offer: Payload },

    #[serde(rename = "call:accepted")]
    CallAccepted { to: ConnectionId, ans: Payload },

    #[serde(rename = "peer:candidate")]
    PeerCandidate { candidate: Payload, to: ConnectionId },

    #[serde(rename = "peer:negotiation")]
    PeerNegotiation { to: ConnectionId, offer: Payload },

    #[serde(rename = "peer:nego:done")]
    PeerNegoDone { to: ConnectionId, ans: Payload },
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::RoomJoin(_) => "room:join",
            ClientEvent::UserCall { .. } => "user:call",
            ClientEvent::CallAccepted { .. } => "call:accepted",
            ClientEvent::PeerCandidate { .. } => "peer:candidate",
            ClientEvent::PeerNegotiation { .. } => "peer:negotiation",
            ClientEvent::PeerNegoDone { .. } => "peer:nego:done",
        }
    }
}

/// Frames the relay sends to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// First frame on every connection: the id the relay assigned to it.
    #[serde(rename = "connected")]
    Connected { id: ConnectionId },

    /// Echo of the joiner's own `room:join`, unchanged.
    #[serde(rename = "room:join")]
    RoomJoin(JoinRequest),

    #[serde(rename = "user:joined")]
    UserJoined { email: String, id: ConnectionId },

    #[serde(rename = "incoming:call")]
    IncomingCall { from: ConnectionId, offer: Payload },

    #[serde(rename = "call:accepted")]
    CallAccepted { from: ConnectionId, ans: Payload },

    #[serde(rename = "peer:candidate")]
    PeerCandidate { candidate: Payload },

    #[serde(rename = "peer:negotiation")]
    PeerNegotiation { from: ConnectionId, offer: Payload },

    #[serde(rename = "peer:nego:final")]
    PeerNegoFinal { from: ConnectionId, ans: Payload },

    /// Only sent when the relay is configured to announce departures.
    #[serde(rename = "user:left")]
    UserLeft { id: ConnectionId },
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Connected { .. } => "connected",
            ServerEvent::RoomJoin(_) => "room:join",
            ServerEvent::UserJoined { .. } => "user:joined",
            ServerEvent::IncomingCall { .. } => "incoming:call",
            ServerEvent::CallAccepted { .. } => "call:accepted",
            ServerEvent::PeerCandidate { .. } => "peer:candidate",
            ServerEvent::PeerNegotiation { .. } => "peer:negotiation",
            ServerEvent::PeerNegoFinal { .. } => "peer:nego:final",
            ServerEvent::UserLeft { .. } => "user:left",
        }
    }
}
