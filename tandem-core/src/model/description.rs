use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Opaque negotiation blob as it travels through the relay. The relay never
/// looks inside; only the two peers decode it.
pub type Payload = Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Answer,
}

impl SdpKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SdpKind::Offer => "offer",
            SdpKind::Answer => "answer",
        }
    }
}

impl fmt::Display for SdpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a session description in the {expected} role, got {found}")]
    RoleMismatch { expected: SdpKind, found: SdpKind },

    #[error("payload must be an object or a JSON-encoded string, got {0}")]
    UnexpectedShape(&'static str),
}

/// Local or remote session description, in the shape browsers serialize
/// `RTCSessionDescription` to: `{"type": "offer", "sdp": "v=0..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub kind: SdpKind,
    pub sdp: String,
}

/// Incoming descriptions may omit `type`; the event they arrived in says
/// which role they play.
#[derive(Deserialize)]
struct UntypedDescription {
    #[serde(rename = "type", default)]
    kind: Option<SdpKind>,
    sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Answer,
            sdp: sdp.into(),
        }
    }

    /// String-encoded form sent through the relay.
    pub fn to_payload(&self) -> Payload {
        let mut object = Map::new();
        object.insert("type".to_owned(), Value::String(self.kind.as_str().to_owned()));
        object.insert("sdp".to_owned(), Value::String(self.sdp.clone()));
        Value::String(Value::Object(object).to_string())
    }

    pub fn from_payload(payload: &Payload, expected: SdpKind) -> Result<Self, PayloadError> {
        let value = unwrap_encoded(payload)?;
        let untyped: UntypedDescription = serde_json::from_value(value)?;

        match untyped.kind {
            Some(found) if found != expected => Err(PayloadError::RoleMismatch { expected, found }),
            _ => Ok(Self {
                kind: expected,
                sdp: untyped.sdp,
            }),
        }
    }
}

/// One network path candidate, shaped like `RTCIceCandidateInit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_mid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_m_line_index: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_fragment: Option<String>,
}

impl IceCandidate {
    pub fn new(candidate: impl Into<String>) -> Self {
        Self {
            candidate: candidate.into(),
            sdp_mid: None,
            sdp_m_line_index: None,
            username_fragment: None,
        }
    }

    pub fn to_payload(&self) -> Payload {
        let mut object = Map::new();
        object.insert("candidate".to_owned(), Value::String(self.candidate.clone()));
        if let Some(mid) = &self.sdp_mid {
            object.insert("sdpMid".to_owned(), Value::String(mid.clone()));
        }
        if let Some(index) = self.sdp_m_line_index {
            object.insert("sdpMLineIndex".to_owned(), Value::from(index));
        }
        if let Some(ufrag) = &self.username_fragment {
            object.insert("usernameFragment".to_owned(), Value::String(ufrag.clone()));
        }
        Value::String(Value::Object(object).to_string())
    }

    pub fn from_payload(payload: &Payload) -> Result<Self, PayloadError> {
        let value = unwrap_encoded(payload)?;
        Ok(serde_json::from_value(value)?)
    }
}

fn unwrap_encoded(payload: &Payload) -> Result<Value, PayloadError> {
    match payload {
        Value::String(text) => Ok(serde_json::from_str(text)?),
        Value::Object(_) => Ok(payload.clone()),
        Value::Null => Err(PayloadError::UnexpectedShape("null")),
        Value::Bool(_) => Err(PayloadError::UnexpectedShape("a boolean")),
        Value::Number(_) => Err(PayloadError::UnexpectedShape("a number")),
        Value::Array(_) => Err(PayloadError::UnexpectedShape("an array")),
    }
}
