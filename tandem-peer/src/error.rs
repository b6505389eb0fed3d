use crate::link::NegotiationState;
use tandem_core::PayloadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkError {
    /// The payload could not be decoded. The link is unchanged; the peer may resend.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] PayloadError),

    /// The operation is not valid in the link's current state. The link is
    /// not reset.
    #[error("{operation} is not allowed in state {state}")]
    InvalidState {
        operation: &'static str,
        state: NegotiationState,
    },

    #[error("RTC engine failure: {0:#}")]
    EngineFailure(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Link(#[from] LinkError),

    #[error("no remote party known yet")]
    NoRemoteParty,

    #[error("session is no longer attached")]
    Detached,
}
