use tandem_core::{SdpKind, SessionDescription};
use tandem_peer::{IceStrategy, NegotiationState};

use crate::integration::init_tracing;
use crate::utils::{EngineCall, mock_link};

#[tokio::test]
async fn test_offer_answer_round_trip_reaches_stable() {
    init_tracing();
    let (mut caller, caller_engine) = mock_link(IceStrategy::Trickle);
    let (mut callee, callee_engine) = mock_link(IceStrategy::Trickle);

    let offer = caller.create_offer().await.unwrap();
    assert_eq!(offer.kind, SdpKind::Offer);
    assert_eq!(caller.state(), NegotiationState::OfferCreated);

    let answer = callee.accept_offer(&offer.to_payload()).await.unwrap();
    assert_eq!(answer.kind, SdpKind::Answer);
    assert_eq!(callee.state(), NegotiationState::Stable);

    caller.accept_answer(&answer.to_payload()).await.unwrap();
    assert_eq!(caller.state(), NegotiationState::Stable);

    assert_eq!(
        caller_engine.calls(),
        vec![
            EngineCall::CreateOffer,
            EngineCall::SetLocal(offer.clone()),
            EngineCall::SetRemote(answer.clone()),
        ]
    );
    assert_eq!(
        callee_engine.calls(),
        vec![
            EngineCall::SetRemote(offer),
            EngineCall::CreateAnswer,
            EngineCall::SetLocal(answer),
        ]
    );
}

#[tokio::test]
async fn test_stable_link_accepts_a_new_offer() {
    init_tracing();
    let (mut link, _engine) = mock_link(IceStrategy::Trickle);

    link.accept_offer(&SessionDescription::offer("v=0\r\no=1").to_payload())
        .await
        .unwrap();
    let second = link
        .accept_offer(&SessionDescription::offer("v=0\r\no=2").to_payload())
        .await
        .unwrap();

    assert_eq!(second.kind, SdpKind::Answer);
    assert_eq!(link.state(), NegotiationState::Stable);
}

#[tokio::test]
async fn test_object_payload_without_type_is_accepted() {
    init_tracing();
    let (mut link, engine) = mock_link(IceStrategy::Trickle);

    link.create_offer().await.unwrap();
    link.accept_answer(&serde_json::json!({"sdp": "v=0\r\no=plain"}))
        .await
        .unwrap();

    assert_eq!(link.state(), NegotiationState::Stable);
    assert!(
        engine
            .calls()
            .contains(&EngineCall::SetRemote(SessionDescription::answer("v=0\r\no=plain")))
    );
}
