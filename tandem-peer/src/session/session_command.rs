use crate::engine::EngineEvent;
use crate::link::{ConnectionLink, NegotiationState};
use bytes::Bytes;
use tandem_core::ConnectionId;
use tokio::sync::{mpsc, oneshot};

/// Point-in-time view of an attached session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: NegotiationState,
    pub remote: Option<ConnectionId>,
    pub queued_candidates: usize,
}

pub enum SessionCommand<E> {
    Call,
    Hangup,
    Send(Bytes),
    ReplaceLink {
        link: ConnectionLink<E>,
        engine_events: mpsc::Receiver<EngineEvent>,
    },
    Snapshot(oneshot::Sender<SessionSnapshot>),
}
