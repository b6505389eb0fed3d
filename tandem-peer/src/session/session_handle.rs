use crate::config::SessionConfig;
use crate::engine::{EngineEvent, RtcEngine};
use crate::error::SessionError;
use crate::link::{ConnectionLink, NegotiationState};
use crate::session::{
    SessionCommand, SessionCoordinator, SessionEvent, SessionSnapshot, SignalingSink,
};
use bytes::Bytes;
use std::sync::Arc;
use tandem_core::ServerEvent;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Both directions of a relay connection.
pub struct RelayChannel {
    pub sink: Arc<dyn SignalingSink>,
    pub events: mpsc::UnboundedReceiver<ServerEvent>,
}

/// Control surface of a running session. Dropping it releases the command
/// channel; the session task then closes the link and ends on its own.
/// [`detach`](Self::detach) does the same and waits for it.
pub struct SessionHandle<E> {
    command_tx: Option<mpsc::UnboundedSender<SessionCommand<E>>>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    task: Option<JoinHandle<()>>,
}

/// Starts driving `link` from relay and engine events on a background task.
pub fn attach<E: RtcEngine>(
    link: ConnectionLink<E>,
    engine_events: mpsc::Receiver<EngineEvent>,
    relay: RelayChannel,
    config: SessionConfig,
) -> SessionHandle<E> {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let coordinator = SessionCoordinator::new(link, relay.sink, events_tx);
    let task = tokio::spawn(run(
        coordinator,
        engine_events,
        relay.events,
        command_rx,
        config,
    ));

    SessionHandle {
        command_tx: Some(command_tx),
        events_rx,
        task: Some(task),
    }
}

impl<E: RtcEngine> SessionHandle<E> {
    pub fn call(&self) -> Result<(), SessionError> {
        self.command(SessionCommand::Call)
    }

    pub fn hangup(&self) -> Result<(), SessionError> {
        self.command(SessionCommand::Hangup)
    }

    pub fn send_message(&self, data: impl Into<Bytes>) -> Result<(), SessionError> {
        self.command(SessionCommand::Send(data.into()))
    }

    /// Replaces the current link, e.g. after `ConnectionFailed`.
    pub fn replace_link(
        &self,
        link: ConnectionLink<E>,
        engine_events: mpsc::Receiver<EngineEvent>,
    ) -> Result<(), SessionError> {
        self.command(SessionCommand::ReplaceLink {
            link,
            engine_events,
        })
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.command(SessionCommand::Snapshot(reply))?;
        rx.await.map_err(|_| SessionError::Detached)
    }

    /// Next event from the session, or `None` once it has stopped.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.recv().await
    }

    /// Stops the session and closes the link.
    pub async fn detach(mut self) {
        self.command_tx.take();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Session task ended abnormally: {}", e);
            }
        }
    }

    fn command(&self, command: SessionCommand<E>) -> Result<(), SessionError> {
        let tx = self.command_tx.as_ref().ok_or(SessionError::Detached)?;
        tx.send(command).map_err(|_| SessionError::Detached)
    }
}

impl<E> Drop for SessionHandle<E> {
    fn drop(&mut self) {
        self.command_tx.take();
    }
}

async fn run<E: RtcEngine>(
    mut coordinator: SessionCoordinator<E>,
    mut engine_events: mpsc::Receiver<EngineEvent>,
    mut relay_events: mpsc::UnboundedReceiver<ServerEvent>,
    mut command_rx: mpsc::UnboundedReceiver<SessionCommand<E>>,
    config: SessionConfig,
) {
    info!("Session started");

    let mut engine_open = true;
    let mut deadline: Option<Instant> = None;
    let mut armed_for: Option<u64> = None;

    loop {
        let timeout = async move {
            match deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            event = relay_events.recv() => match event {
                Some(e) => {
                    let result = coordinator.handle_server_event(e).await;
                    coordinator.report(result);
                }
                None => {
                    info!("Relay connection closed. Ending session");
                    break;
                }
            },

            event = engine_events.recv(), if engine_open => match event {
                Some(e) => {
                    let result = coordinator.handle_engine_event(e).await;
                    coordinator.report(result);
                }
                None => {
                    debug!("Engine event channel closed");
                    engine_open = false;
                }
            },

            cmd = command_rx.recv() => match cmd {
                Some(SessionCommand::Call) => {
                    let result = coordinator.call().await;
                    coordinator.report(result);
                }
                Some(SessionCommand::Hangup) => {
                    let result = coordinator.hangup().await;
                    coordinator.report(result);
                }
                Some(SessionCommand::Send(data)) => {
                    let result = coordinator.send_message(data).await;
                    coordinator.report(result);
                }
                Some(SessionCommand::ReplaceLink { link, engine_events: events }) => {
                    coordinator.replace_link(link).await;
                    engine_events = events;
                    engine_open = true;
                }
                Some(SessionCommand::Snapshot(reply)) => {
                    let _ = reply.send(coordinator.snapshot());
                }
                None => {
                    info!("Session handle released. Ending session");
                    break;
                }
            },

            _ = timeout => {
                coordinator.fail("no answer before the negotiation timeout").await;
            }
        }

        // Each new offer gets a full timeout, even when one round settles
        // and the next starts within the same event.
        let link = coordinator.link();
        match link.state() {
            NegotiationState::OfferCreated => {
                let generation = link.offer_generation();
                if armed_for != Some(generation) {
                    armed_for = Some(generation);
                    deadline = config.negotiation_timeout.map(|t| Instant::now() + t);
                }
            }
            _ => {
                armed_for = None;
                deadline = None;
            }
        }
    }

    coordinator.shutdown().await;
    info!("Session finished");
}
