use tandem_core::ConnectionId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// A frame that does not decode as a known client event.
    #[error("malformed signaling frame: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// The destination of a relayed event is not connected. Never reported
    /// back to the sender.
    #[error("connection {0} is not connected")]
    UnreachablePeer(ConnectionId),

    #[error("room registry task has stopped")]
    RegistryClosed,
}
