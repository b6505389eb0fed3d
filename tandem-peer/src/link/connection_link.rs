use crate::config::IceStrategy;
use crate::engine::RtcEngine;
use crate::error::LinkError;
use crate::link::NegotiationState;
use bytes::Bytes;
use std::collections::VecDeque;
use tandem_core::{IceCandidate, Payload, SdpKind, SessionDescription};
use tracing::{debug, info, warn};

/// Outcome of [`ConnectionLink::renegotiation_needed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renegotiation {
    /// The link moved to `Negotiating`; create and send a new offer now.
    Proceed,
    /// A round is in flight. One retry is remembered for when it settles.
    Deferred,
    /// Nothing negotiated yet, or the link is closed.
    Ignored,
}

/// One peer-to-peer connection and its negotiation bookkeeping.
///
/// Remote candidates that arrive before any remote description has been
/// applied are queued, then applied in arrival order right after the first
/// remote description lands. Malformed payloads and calls made in the wrong
/// state leave the link untouched.
pub struct ConnectionLink<E> {
    engine: E,
    state: NegotiationState,
    ice_strategy: IceStrategy,
    remote_applied: bool,
    candidate_queue: VecDeque<IceCandidate>,
    renegotiation_deferred: bool,
    offers_created: u64,
}

impl<E: RtcEngine> ConnectionLink<E> {
    pub fn new(engine: E, ice_strategy: IceStrategy) -> Self {
        Self {
            engine,
            state: NegotiationState::Idle,
            ice_strategy,
            remote_applied: false,
            candidate_queue: VecDeque::new(),
            renegotiation_deferred: false,
            offers_created: 0,
        }
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn ice_strategy(&self) -> IceStrategy {
        self.ice_strategy
    }

    pub fn has_remote_description(&self) -> bool {
        self.remote_applied
    }

    pub fn queued_candidates(&self) -> usize {
        self.candidate_queue.len()
    }

    pub fn renegotiation_deferred(&self) -> bool {
        self.renegotiation_deferred
    }

    /// Number of offers committed so far. Changes each time a new round
    /// starts from our side.
    pub fn offer_generation(&self) -> u64 {
        self.offers_created
    }

    /// Produces and commits a local offer. Allowed from `Idle`, `Stable`
    /// and `Negotiating`.
    pub async fn create_offer(&mut self) -> Result<SessionDescription, LinkError> {
        self.ensure(
            "create_offer",
            &[
                NegotiationState::Idle,
                NegotiationState::Stable,
                NegotiationState::Negotiating,
            ],
        )?;

        let offer = self.engine.create_offer().await?;
        self.engine.set_local_description(offer.clone()).await?;
        let offer = self.outgoing(offer).await;

        self.offers_created += 1;
        self.transition(NegotiationState::OfferCreated);
        Ok(offer)
    }

    /// Applies a remote offer and returns the committed answer.
    ///
    /// Once the remote offer is applied the engine is mid-round; if the
    /// answer cannot be produced or committed the link is closed.
    pub async fn accept_offer(&mut self, payload: &Payload) -> Result<SessionDescription, LinkError> {
        self.ensure(
            "accept_offer",
            &[NegotiationState::Idle, NegotiationState::Stable],
        )?;
        let offer = SessionDescription::from_payload(payload, SdpKind::Offer)?;

        self.engine.set_remote_description(offer).await?;
        self.remote_applied = true;
        self.transition(NegotiationState::AnswerPending);
        self.drain_candidates().await;

        let answer = match self.commit_answer().await {
            Ok(answer) => answer,
            Err(e) => return Err(self.abort_round(e).await),
        };
        let answer = self.outgoing(answer).await;

        self.transition(NegotiationState::Stable);
        Ok(answer)
    }

    /// Applies the remote answer to our outstanding offer.
    pub async fn accept_answer(&mut self, payload: &Payload) -> Result<(), LinkError> {
        self.ensure("accept_answer", &[NegotiationState::OfferCreated])?;
        let answer = SessionDescription::from_payload(payload, SdpKind::Answer)?;

        self.engine.set_remote_description(answer).await?;
        self.remote_applied = true;
        self.drain_candidates().await;

        self.transition(NegotiationState::Stable);
        Ok(())
    }

    /// Applies a remote candidate, or queues it while no remote description
    /// exists yet.
    pub async fn add_remote_candidate(&mut self, payload: &Payload) -> Result<(), LinkError> {
        if self.state == NegotiationState::Closed {
            return Err(self.invalid("add_remote_candidate"));
        }
        let candidate = IceCandidate::from_payload(payload)?;

        if self.remote_applied {
            self.engine.add_ice_candidate(candidate).await?;
        } else {
            self.candidate_queue.push_back(candidate);
            debug!(
                "Queued remote ICE candidate ({} waiting)",
                self.candidate_queue.len()
            );
        }
        Ok(())
    }

    /// Applies every queued candidate in arrival order and empties the queue.
    /// Does nothing until a remote description has been applied. Returns how
    /// many candidates the engine accepted.
    pub async fn drain_candidates(&mut self) -> usize {
        if !self.remote_applied || self.candidate_queue.is_empty() {
            return 0;
        }

        let queued = std::mem::take(&mut self.candidate_queue);
        let total = queued.len();
        let mut applied = 0;
        for candidate in queued {
            match self.engine.add_ice_candidate(candidate).await {
                Ok(()) => applied += 1,
                Err(e) => warn!("Failed to apply queued ICE candidate: {:#}", e),
            }
        }

        debug!("Drained {}/{} queued ICE candidates", applied, total);
        applied
    }

    /// Called when the engine asks for another negotiation round.
    pub fn renegotiation_needed(&mut self) -> Renegotiation {
        match self.state {
            NegotiationState::Stable => {
                self.transition(NegotiationState::Negotiating);
                Renegotiation::Proceed
            }
            state if state.is_negotiating() => {
                self.renegotiation_deferred = true;
                Renegotiation::Deferred
            }
            _ => Renegotiation::Ignored,
        }
    }

    /// Takes the remembered renegotiation request once the link is `Stable`.
    pub fn take_deferred_renegotiation(&mut self) -> bool {
        if self.state == NegotiationState::Stable && self.renegotiation_deferred {
            self.renegotiation_deferred = false;
            return true;
        }
        false
    }

    /// Returns from `Negotiating` to `Stable` when the renegotiation offer
    /// could not be produced or sent.
    pub fn abandon_renegotiation(&mut self) {
        if self.state == NegotiationState::Negotiating {
            self.transition(NegotiationState::Stable);
        }
    }

    /// Sends application data over the link's data channel.
    pub async fn send_message(&self, data: Bytes) -> Result<(), LinkError> {
        if self.state == NegotiationState::Closed {
            return Err(self.invalid("send_message"));
        }
        self.engine.send_message(data).await?;
        Ok(())
    }

    pub async fn close(&mut self) -> Result<(), LinkError> {
        if self.state == NegotiationState::Closed {
            return Ok(());
        }

        self.candidate_queue.clear();
        self.renegotiation_deferred = false;
        self.transition(NegotiationState::Closed);

        self.engine.close().await?;
        Ok(())
    }

    async fn commit_answer(&self) -> anyhow::Result<SessionDescription> {
        let answer = self.engine.create_answer().await?;
        self.engine.set_local_description(answer.clone()).await?;
        Ok(answer)
    }

    async fn abort_round(&mut self, cause: anyhow::Error) -> LinkError {
        warn!("Could not answer remote offer, closing link: {:#}", cause);
        self.candidate_queue.clear();
        self.renegotiation_deferred = false;
        self.transition(NegotiationState::Closed);

        if let Err(e) = self.engine.close().await {
            warn!("Failed to close engine after aborted round: {:#}", e);
        }
        LinkError::EngineFailure(cause)
    }

    async fn outgoing(&self, committed: SessionDescription) -> SessionDescription {
        let IceStrategy::GatherThenSend { timeout } = self.ice_strategy else {
            return committed;
        };

        if !self.engine.wait_for_gathering(timeout).await {
            warn!(
                "ICE gathering did not finish within {:?}; sending the {} with the candidates gathered so far",
                timeout, committed.kind
            );
        }

        match self.engine.local_description().await {
            Some(gathered) if gathered.kind == committed.kind => gathered,
            _ => committed,
        }
    }

    fn ensure(
        &self,
        operation: &'static str,
        allowed: &[NegotiationState],
    ) -> Result<(), LinkError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(self.invalid(operation))
        }
    }

    fn invalid(&self, operation: &'static str) -> LinkError {
        LinkError::InvalidState {
            operation,
            state: self.state,
        }
    }

    fn transition(&mut self, next: NegotiationState) {
        if self.state != next {
            info!("Link {} -> {}", self.state, next);
            self.state = next;
        }
    }
}
