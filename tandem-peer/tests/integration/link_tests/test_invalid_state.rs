use tandem_core::SessionDescription;
use tandem_peer::{IceStrategy, LinkError, NegotiationState};

use crate::integration::init_tracing;
use crate::utils::mock_link;

#[tokio::test]
async fn test_answer_without_offer_is_rejected() {
    init_tracing();
    let (mut link, engine) = mock_link(IceStrategy::Trickle);

    let answer = SessionDescription::answer("v=0").to_payload();
    let err = link.accept_answer(&answer).await.unwrap_err();

    assert!(matches!(
        err,
        LinkError::InvalidState {
            operation: "accept_answer",
            state: NegotiationState::Idle
        }
    ));
    assert_eq!(link.state(), NegotiationState::Idle);
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn test_second_answer_in_a_round_is_rejected() {
    init_tracing();
    let (mut link, engine) = mock_link(IceStrategy::Trickle);

    link.create_offer().await.unwrap();
    let answer = SessionDescription::answer("v=0").to_payload();
    link.accept_answer(&answer).await.unwrap();
    let calls_before = engine.calls().len();

    let err = link.accept_answer(&answer).await.unwrap_err();

    assert!(matches!(
        err,
        LinkError::InvalidState {
            state: NegotiationState::Stable,
            ..
        }
    ));
    assert_eq!(link.state(), NegotiationState::Stable);
    assert_eq!(engine.calls().len(), calls_before);
}

#[tokio::test]
async fn test_offer_while_own_offer_outstanding_is_rejected() {
    init_tracing();
    let (mut link, _engine) = mock_link(IceStrategy::Trickle);

    link.create_offer().await.unwrap();

    let remote = SessionDescription::offer("v=0").to_payload();
    let err = link.accept_offer(&remote).await.unwrap_err();
    assert!(matches!(
        err,
        LinkError::InvalidState {
            operation: "accept_offer",
            state: NegotiationState::OfferCreated
        }
    ));
    assert_eq!(link.state(), NegotiationState::OfferCreated);

    assert!(matches!(
        link.create_offer().await,
        Err(LinkError::InvalidState { .. })
    ));
}
