use tandem_core::ClientEvent;

/// Outbound side of the relay connection, as seen by a session.
///
/// Sending is fire-and-forget: a closed relay drops the event.
pub trait SignalingSink: Send + Sync {
    fn send(&self, event: ClientEvent);
}
