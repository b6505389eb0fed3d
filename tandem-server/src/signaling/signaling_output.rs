use crate::error::RelayError;
use async_trait::async_trait;
use tandem_core::{ConnectionId, ServerEvent};

/// Delivery side of the relay: whatever owns the client sockets implements
/// this so the registry can reach connections by id.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Send `event` to the connection `to`.
    ///
    /// Fails with [`RelayError::UnreachablePeer`] if `to` is not connected;
    /// callers drop the event in that case.
    async fn emit(&self, to: &ConnectionId, event: ServerEvent) -> Result<(), RelayError>;
}
