use bytes::Bytes;
use tandem_core::IceCandidate;

/// What the RTC engine reports back to whoever drives the link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A local candidate was gathered and should be trickled to the remote party.
    LocalCandidate(IceCandidate),

    /// Local changes (e.g. a new track) need another offer/answer round.
    NegotiationNeeded,

    Connected,

    /// The connection failed or dropped.
    Failed,

    /// A data channel finished opening.
    DataChannelOpen(String),

    DataChannelMessage { label: String, data: Bytes },
}
