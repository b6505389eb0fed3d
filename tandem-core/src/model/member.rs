use crate::model::connection::ConnectionId;
use serde::{Deserialize, Serialize};

/// A participant of a room: who they say they are plus where to reach them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    pub email: String,
    pub id: ConnectionId,
}

impl Member {
    pub fn new(email: impl Into<String>, id: ConnectionId) -> Self {
        Self {
            email: email.into(),
            id,
        }
    }
}
