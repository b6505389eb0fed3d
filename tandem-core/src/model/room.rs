use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Caller supplied room name. Rooms have no lifecycle of their own: a room
/// exists while somebody is in it.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
#[serde(transparent)]
pub struct RoomName(String);

impl RoomName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for RoomName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of a `room:join` frame. The relay echoes it back to the joiner
/// exactly as received, unknown fields included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest {
    pub email: String,
    pub room: RoomName,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JoinRequest {
    pub fn new(email: impl Into<String>, room: impl Into<RoomName>) -> Self {
        Self {
            email: email.into(),
            room: room.into(),
            extra: Map::new(),
        }
    }
}
