use std::fmt;

/// Where a link stands in the offer/answer exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NegotiationState {
    Idle,
    /// Local offer committed and sent; waiting for the answer.
    OfferCreated,
    /// Remote offer applied; the answer is being produced.
    AnswerPending,
    Stable,
    /// Renegotiation accepted; the new offer is being produced.
    Negotiating,
    Closed,
}

impl NegotiationState {
    /// A round is in flight and a further renegotiation must wait.
    pub fn is_negotiating(self) -> bool {
        matches!(
            self,
            NegotiationState::OfferCreated
                | NegotiationState::AnswerPending
                | NegotiationState::Negotiating
        )
    }
}

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NegotiationState::Idle => "idle",
            NegotiationState::OfferCreated => "offer-created",
            NegotiationState::AnswerPending => "answer-pending",
            NegotiationState::Stable => "stable",
            NegotiationState::Negotiating => "negotiating",
            NegotiationState::Closed => "closed",
        };
        f.write_str(name)
    }
}
