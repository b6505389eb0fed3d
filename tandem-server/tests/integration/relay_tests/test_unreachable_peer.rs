use serde_json::json;
use tandem_core::{ClientEvent, ConnectionId};
use tandem_server::RelayConfig;

use crate::integration::{init_tracing, spawn_relay};
use crate::utils::TestClient;

#[tokio::test]
async fn test_unreachable_peer_is_dropped() {
    init_tracing();

    let (addr, _service) = spawn_relay(RelayConfig::default()).await;
    let mut sender = TestClient::connect(addr).await.unwrap();
    let mut bystander = TestClient::connect(addr).await.unwrap();

    sender
        .send(&ClientEvent::UserCall {
            to_user: ConnectionId::from("nobody-is-here"),
            offer: json!("{}"),
        })
        .await
        .unwrap();

    sender.expect_silence().await.expect("no error goes back to the sender");
    bystander.expect_silence().await.expect("nobody else sees it");

    // The sender's connection is still fully usable.
    sender.join("sender@example.com", "after").await.unwrap();
}

#[tokio::test]
async fn test_closed_peer_becomes_unreachable() {
    init_tracing();

    let (addr, service) = spawn_relay(RelayConfig::default()).await;
    let mut sender = TestClient::connect(addr).await.unwrap();
    let target = TestClient::connect(addr).await.unwrap();
    let target_id = target.id.clone();

    target.close().await.unwrap();
    for _ in 0..50 {
        if !service.is_connected(&target_id) {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert!(!service.is_connected(&target_id));

    sender
        .send(&ClientEvent::CallAccepted {
            to: target_id,
            ans: json!("late"),
        })
        .await
        .unwrap();
    sender.expect_silence().await.unwrap();
}
