use crate::error::RelayError;
use crate::registry::{RegistryCommand, RegistryTask};
use crate::signaling::SignalingOutput;
use crate::signaling::route::{Route, route};
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use std::sync::Arc;
use tandem_core::{ClientEvent, ConnectionId, JoinRequest, Member, RoomName, ServerEvent};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

struct SignalingInner {
    connections: DashMap<ConnectionId, mpsc::UnboundedSender<Message>>,
}

/// Connection table plus the handle to the registry task. Cheap to clone;
/// every WebSocket handler holds one.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
    registry_tx: mpsc::Sender<RegistryCommand>,
}

impl SignalingService {
    pub fn new(registry_tx: mpsc::Sender<RegistryCommand>) -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                connections: DashMap::new(),
            }),
            registry_tx,
        }
    }

    /// Creates the service and spawns the registry task that serves it.
    pub fn spawn(registry_capacity: usize, notify_on_leave: bool) -> Self {
        let (registry_tx, registry_rx) = mpsc::channel(registry_capacity);
        let service = Self::new(registry_tx);

        let task = RegistryTask::new(registry_rx, Arc::new(service.clone()), notify_on_leave);
        tokio::spawn(task.run());

        service
    }

    pub fn add_connection(&self, id: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.connections.insert(id, tx);
    }

    pub fn remove_connection(&self, id: &ConnectionId) {
        self.inner.connections.remove(id);
    }

    pub fn is_connected(&self, id: &ConnectionId) -> bool {
        self.inner.connections.contains_key(id)
    }

    pub fn connection_count(&self) -> usize {
        self.inner.connections.len()
    }

    pub fn send_signal(&self, to: &ConnectionId, event: &ServerEvent) -> Result<(), RelayError> {
        let Some(connection) = self.inner.connections.get(to) else {
            return Err(RelayError::UnreachablePeer(to.clone()));
        };

        let json = serde_json::to_string(event)?;
        if let Err(e) = connection.send(Message::Text(json.into())) {
            error!("Failed to send WS message to {}: {:?}", to, e);
            return Err(RelayError::UnreachablePeer(to.clone()));
        }
        Ok(())
    }

    /// Handles one decoded frame from `from`.
    pub async fn dispatch(&self, from: &ConnectionId, event: ClientEvent) -> Result<(), RelayError> {
        let name = event.name();

        match route(from, event) {
            Route::Join { request, member } => self.join(request, member).await,
            Route::Forward { to, event } => {
                debug!("Relaying {} from {} to {}", name, from, to);
                self.send_signal(&to, &event)
            }
        }
    }

    pub async fn join(&self, request: JoinRequest, member: Member) -> Result<(), RelayError> {
        self.registry_tx
            .send(RegistryCommand::Join { request, member })
            .await
            .map_err(|_| RelayError::RegistryClosed)
    }

    /// Forgets `id`: no more deliveries, and the registry drops it from every room.
    pub async fn disconnect(&self, id: &ConnectionId) -> Result<(), RelayError> {
        self.remove_connection(id);

        self.registry_tx
            .send(RegistryCommand::Disconnect { id: id.clone() })
            .await
            .map_err(|_| RelayError::RegistryClosed)
    }

    pub async fn members(&self, room: RoomName) -> Result<Vec<Member>, RelayError> {
        let (reply, rx) = oneshot::channel();

        self.registry_tx
            .send(RegistryCommand::Members { room, reply })
            .await
            .map_err(|_| RelayError::RegistryClosed)?;

        rx.await.map_err(|_| RelayError::RegistryClosed)
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn emit(&self, to: &ConnectionId, event: ServerEvent) -> Result<(), RelayError> {
        self.send_signal(to, &event)
    }
}
