use tandem_core::{ConnectionId, JoinRequest, Member, RoomName};
use tokio::sync::oneshot;

/// Mutations and queries for the room registry. The registry task is the
/// only writer; every connection handler talks to it through this channel.
#[derive(Debug)]
pub enum RegistryCommand {
    /// A connection sent `room:join`. `request` is echoed back verbatim.
    Join { request: JoinRequest, member: Member },

    /// The connection's WebSocket closed.
    Disconnect { id: ConnectionId },

    /// Snapshot of a room's current members.
    Members {
        room: RoomName,
        reply: oneshot::Sender<Vec<Member>>,
    },
}

impl RegistryCommand {
    /// Join with a plain `{email, room}` request built from `member`.
    pub fn join(room: impl Into<RoomName>, member: Member) -> Self {
        RegistryCommand::Join {
            request: JoinRequest::new(member.email.clone(), room),
            member,
        }
    }
}
