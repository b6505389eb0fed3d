
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::Level;

use tandem_core::{ClientEvent, ConnectionId, ServerEvent};
use tandem_peer::{IceStrategy, SessionCoordinator, SessionEvent};

use crate::utils::{MockEngine, RecordingSink, mock_link};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Coordinator over a mock engine with trickle ICE, plus everything a test
/// needs to observe it.
pub struct CoordinatorFixture {
    pub coordinator: SessionCoordinator<MockEngine>,
    pub engine: MockEngine,
    pub sink: RecordingSink,
    pub outbound: mpsc::UnboundedReceiver<ClientEvent>,
    pub events: mpsc::UnboundedReceiver<SessionEvent>,
}

pub fn create_coordinator() -> CoordinatorFixture {
    let (link, engine) = mock_link(IceStrategy::Trickle);
    let (sink, outbound) = RecordingSink::new();
    let (events_tx, events) = mpsc::unbounded_channel();

    let coordinator = SessionCoordinator::new(link, Arc::new(sink.clone()), events_tx);

    CoordinatorFixture {
        coordinator,
        engine,
        sink,
        outbound,
        events,
    }
}

pub fn user_joined(id: &str) -> ServerEvent {
    ServerEvent::UserJoined {
        email: format!("{id}@example.com"),
        id: ConnectionId::from(id),
    }
}
