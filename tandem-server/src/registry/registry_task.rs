use crate::error::RelayError;
use crate::registry::registry_command::RegistryCommand;
use crate::registry::room_registry::RoomRegistry;
use crate::signaling::SignalingOutput;
use std::sync::Arc;
use tandem_core::{ConnectionId, JoinRequest, Member, ServerEvent};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Owns the [`RoomRegistry`] and applies [`RegistryCommand`]s one at a time.
pub struct RegistryTask {
    registry: RoomRegistry,
    command_rx: mpsc::Receiver<RegistryCommand>,
    signaling: Arc<dyn SignalingOutput>,
    notify_on_leave: bool,
}

impl RegistryTask {
    pub fn new(
        command_rx: mpsc::Receiver<RegistryCommand>,
        signaling: Arc<dyn SignalingOutput>,
        notify_on_leave: bool,
    ) -> Self {
        Self {
            registry: RoomRegistry::new(),
            command_rx,
            signaling,
            notify_on_leave,
        }
    }

    pub async fn run(mut self) {
        info!("Registry event loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Command channel closed. Registry event loop finished");
    }

    async fn handle_command(&mut self, cmd: RegistryCommand) {
        match cmd {
            RegistryCommand::Join { request, member } => self.join(request, member).await,

            RegistryCommand::Disconnect { id } => self.disconnect(&id).await,

            RegistryCommand::Members { room, reply } => {
                let _ = reply.send(self.registry.members(&room));
            }
        }
    }

    async fn join(&mut self, request: JoinRequest, member: Member) {
        info!("{} ({}) joins room '{}'", member.id, member.email, request.room);

        let others = self.registry.join(request.room.clone(), member.clone());

        for other in others {
            let event = ServerEvent::UserJoined {
                email: member.email.clone(),
                id: member.id.clone(),
            };
            self.emit(&other, event).await;
        }

        self.emit(&member.id, ServerEvent::RoomJoin(request)).await;
    }

    async fn disconnect(&mut self, id: &ConnectionId) {
        let departures = self.registry.disconnect(id);
        if departures.is_empty() {
            return;
        }
        info!("{} left {} room(s)", id, departures.len());

        if !self.notify_on_leave {
            return;
        }
        for departure in departures {
            for other in departure.remaining {
                self.emit(&other, ServerEvent::UserLeft { id: id.clone() }).await;
            }
        }
    }

    async fn emit(&self, to: &ConnectionId, event: ServerEvent) {
        match self.signaling.emit(to, event).await {
            Ok(()) => {}
            Err(RelayError::UnreachablePeer(id)) => {
                debug!("Dropping registry event for departed connection {}", id);
            }
            Err(e) => warn!("Failed to deliver registry event to {}: {}", to, e),
        }
    }
}
