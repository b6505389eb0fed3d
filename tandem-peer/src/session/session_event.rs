use bytes::Bytes;
use tandem_core::ConnectionId;

/// Things a session reports to the application driving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Someone joined the room and is now the remote party. Calling them is
    /// up to the application.
    PeerJoined { email: String, id: ConnectionId },

    /// A remote offer was received and is being answered.
    IncomingCall { from: ConnectionId },

    /// A negotiation round finished; the link is `Stable`.
    Negotiated,

    /// The engine reports the peer connection as up.
    Connected,

    DataChannelOpen { label: String },

    /// Data received on a data channel.
    Message { label: String, data: Bytes },

    /// The link failed and was closed. Replace it to try again.
    ConnectionFailed { reason: String },

    PeerLeft { id: ConnectionId },

    /// A signaling event or command could not be handled. The link is
    /// left as it was.
    Error { message: String },
}
