use tandem_core::ConnectionId;
use tandem_peer::{NegotiationState, SessionError, SessionEvent};

use crate::integration::{create_coordinator, init_tracing, user_joined};

#[tokio::test]
async fn test_joined_peer_becomes_remote_without_a_call() {
    init_tracing();
    let mut fx = create_coordinator();

    fx.coordinator
        .handle_server_event(user_joined("bob"))
        .await
        .unwrap();

    assert_eq!(fx.coordinator.remote(), Some(&ConnectionId::from("bob")));
    assert_eq!(fx.coordinator.link().state(), NegotiationState::Idle);
    assert!(fx.sink.sent().is_empty(), "joining must not trigger an offer");
    assert_eq!(
        fx.events.try_recv().unwrap(),
        SessionEvent::PeerJoined {
            email: "bob@example.com".to_owned(),
            id: ConnectionId::from("bob"),
        }
    );
}

#[tokio::test]
async fn test_latest_joiner_replaces_remote() {
    init_tracing();
    let mut fx = create_coordinator();

    fx.coordinator.handle_server_event(user_joined("bob")).await.unwrap();
    fx.coordinator.handle_server_event(user_joined("carol")).await.unwrap();

    assert_eq!(fx.coordinator.remote(), Some(&ConnectionId::from("carol")));
}

#[tokio::test]
async fn test_call_without_remote_fails() {
    init_tracing();
    let mut fx = create_coordinator();

    let err = fx.coordinator.call().await.unwrap_err();

    assert!(matches!(err, SessionError::NoRemoteParty));
    assert!(fx.engine.calls().is_empty());
}

#[tokio::test]
async fn test_departed_remote_is_forgotten() {
    init_tracing();
    let mut fx = create_coordinator();

    fx.coordinator.handle_server_event(user_joined("bob")).await.unwrap();
    fx.coordinator
        .handle_server_event(tandem_core::ServerEvent::UserLeft {
            id: ConnectionId::from("bob"),
        })
        .await
        .unwrap();

    assert_eq!(fx.coordinator.remote(), None);
}
