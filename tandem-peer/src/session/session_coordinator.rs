use crate::engine::{EngineEvent, RtcEngine};
use crate::error::{LinkError, SessionError};
use crate::link::{ConnectionLink, NegotiationState, Renegotiation};
use crate::session::{SessionEvent, SessionSnapshot, SignalingSink};
use bytes::Bytes;
use std::sync::Arc;
use tandem_core::{ClientEvent, ConnectionId, ServerEvent};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Wires relay events and engine events to one [`ConnectionLink`].
///
/// Tracks the single remote party the link is paired with. Joining
/// participants are only recorded; calling them is an explicit
/// [`call`](Self::call).
pub struct SessionCoordinator<E> {
    link: ConnectionLink<E>,
    signaling: Arc<dyn SignalingSink>,
    remote: Option<ConnectionId>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl<E: RtcEngine> SessionCoordinator<E> {
    pub fn new(
        link: ConnectionLink<E>,
        signaling: Arc<dyn SignalingSink>,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        Self {
            link,
            signaling,
            remote: None,
            events,
        }
    }

    pub fn link(&self) -> &ConnectionLink<E> {
        &self.link
    }

    pub fn remote(&self) -> Option<&ConnectionId> {
        self.remote.as_ref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.link.state(),
            remote: self.remote.clone(),
            queued_candidates: self.link.queued_candidates(),
        }
    }

    pub async fn handle_server_event(&mut self, event: ServerEvent) -> Result<(), SessionError> {
        match event {
            ServerEvent::UserJoined { email, id } => {
                info!("{} ({}) joined the room", email, id);
                self.remote = Some(id.clone());
                self.notify(SessionEvent::PeerJoined { email, id });
            }

            ServerEvent::IncomingCall { from, offer } => {
                info!("Incoming call from {}", from);
                self.remote = Some(from.clone());
                self.notify(SessionEvent::IncomingCall { from: from.clone() });

                let answer = match self.link.accept_offer(&offer).await {
                    Ok(answer) => answer,
                    Err(e) => return self.answer_failed(e).await,
                };
                self.signaling.send(ClientEvent::CallAccepted {
                    to: from,
                    ans: answer.to_payload(),
                });
                self.settled().await?;
            }

            ServerEvent::CallAccepted { from, ans } => {
                debug!("Call accepted by {}", from);
                self.link.accept_answer(&ans).await?;
                self.settled().await?;
            }

            ServerEvent::PeerNegotiation { from, offer } => {
                debug!("Renegotiation offer from {}", from);
                let answer = match self.link.accept_offer(&offer).await {
                    Ok(answer) => answer,
                    Err(e) => return self.answer_failed(e).await,
                };
                self.signaling.send(ClientEvent::PeerNegoDone {
                    to: from,
                    ans: answer.to_payload(),
                });
                self.settled().await?;
            }

            ServerEvent::PeerNegoFinal { from, ans } => {
                debug!("Renegotiation answer from {}", from);
                self.link.accept_answer(&ans).await?;
                self.settled().await?;
            }

            ServerEvent::PeerCandidate { candidate } => {
                self.link.add_remote_candidate(&candidate).await?;
            }

            ServerEvent::UserLeft { id } => {
                info!("{} left the room", id);
                if self.remote.as_ref() == Some(&id) {
                    self.remote = None;
                }
                self.notify(SessionEvent::PeerLeft { id });
            }

            ServerEvent::Connected { .. } | ServerEvent::RoomJoin(_) => {}
        }
        Ok(())
    }

    pub async fn handle_engine_event(&mut self, event: EngineEvent) -> Result<(), SessionError> {
        match event {
            EngineEvent::LocalCandidate(candidate) => match &self.remote {
                Some(to) => self.signaling.send(ClientEvent::PeerCandidate {
                    candidate: candidate.to_payload(),
                    to: to.clone(),
                }),
                None => debug!("No remote party yet; dropping local ICE candidate"),
            },

            EngineEvent::NegotiationNeeded => self.renegotiate().await?,

            EngineEvent::Connected => self.notify(SessionEvent::Connected),

            EngineEvent::DataChannelOpen(label) => {
                self.notify(SessionEvent::DataChannelOpen { label })
            }

            EngineEvent::DataChannelMessage { label, data } => {
                debug!("{} bytes on data channel '{}'", data.len(), label);
                self.notify(SessionEvent::Message { label, data })
            }

            EngineEvent::Failed => self.fail("peer connection failed").await,
        }
        Ok(())
    }

    /// Offers a connection to the current remote party.
    pub async fn call(&mut self) -> Result<(), SessionError> {
        let to = self.remote.clone().ok_or(SessionError::NoRemoteParty)?;

        let offer = self.link.create_offer().await?;
        info!("Calling {}", to);
        self.signaling.send(ClientEvent::UserCall {
            to_user: to,
            offer: offer.to_payload(),
        });
        Ok(())
    }

    pub async fn send_message(&mut self, data: Bytes) -> Result<(), SessionError> {
        self.link.send_message(data).await?;
        Ok(())
    }

    /// Closes the link. The remote party is kept so a fresh link can call again.
    pub async fn hangup(&mut self) -> Result<(), SessionError> {
        self.link.close().await?;
        Ok(())
    }

    /// Marks the link failed: tells the application, then closes it.
    pub async fn fail(&mut self, reason: &str) {
        warn!("Link failed: {}", reason);
        self.notify(SessionEvent::ConnectionFailed {
            reason: reason.to_owned(),
        });
        if let Err(e) = self.link.close().await {
            error!("Failed to close link: {}", e);
        }
    }

    /// Swaps in a fresh link, closing the old one.
    pub async fn replace_link(&mut self, link: ConnectionLink<E>) {
        let mut old = std::mem::replace(&mut self.link, link);
        if let Err(e) = old.close().await {
            warn!("Failed to close replaced link: {}", e);
        }
    }

    pub fn report(&self, result: Result<(), SessionError>) {
        if let Err(e) = result {
            warn!("Session error: {}", e);
            self.notify(SessionEvent::Error {
                message: e.to_string(),
            });
        }
    }

    async fn renegotiate(&mut self) -> Result<(), SessionError> {
        match self.link.renegotiation_needed() {
            Renegotiation::Proceed => {}
            Renegotiation::Deferred => {
                debug!("Renegotiation deferred until the current round settles");
                return Ok(());
            }
            Renegotiation::Ignored => {
                debug!("Ignoring renegotiation request in state {}", self.link.state());
                return Ok(());
            }
        }

        let Some(to) = self.remote.clone() else {
            self.link.abandon_renegotiation();
            return Err(SessionError::NoRemoteParty);
        };

        match self.link.create_offer().await {
            Ok(offer) => {
                self.signaling.send(ClientEvent::PeerNegotiation {
                    to,
                    offer: offer.to_payload(),
                });
                Ok(())
            }
            Err(e) => {
                self.link.abandon_renegotiation();
                Err(e.into())
            }
        }
    }

    /// A link that closed itself while answering is reported as failed.
    /// Other errors leave the link usable and are returned as-is.
    async fn answer_failed(&mut self, error: LinkError) -> Result<(), SessionError> {
        if matches!(error, LinkError::EngineFailure(_))
            && self.link.state() == NegotiationState::Closed
        {
            self.fail(&error.to_string()).await;
            return Ok(());
        }
        Err(error.into())
    }

    async fn settled(&mut self) -> Result<(), SessionError> {
        self.notify(SessionEvent::Negotiated);
        if self.link.take_deferred_renegotiation() {
            debug!("Running deferred renegotiation");
            self.renegotiate().await?;
        }
        Ok(())
    }

    fn notify(&self, event: SessionEvent) {
        // Receiver may be gone.
        let _ = self.events.send(event);
    }

    pub(crate) async fn shutdown(mut self) {
        if let Err(e) = self.link.close().await {
            warn!("Failed to close link on detach: {}", e);
        }
    }
}
