use serde_json::json;
use tandem_core::{RoomName, ServerEvent};
use tandem_server::RelayConfig;

use crate::integration::{init_tracing, spawn_relay};
use crate::utils::TestClient;

#[tokio::test]
async fn test_join_echo_preserves_client_fields() {
    init_tracing();

    let (addr, service) = spawn_relay(RelayConfig::default()).await;
    let mut client = TestClient::connect(addr).await.unwrap();

    let frame = json!({
        "event": "room:join",
        "data": {"email": "a@example.com", "room": "lobby", "nick": "al", "camera": false}
    });
    client.send_raw(&frame.to_string()).await.unwrap();

    let echo = client.recv().await.unwrap();
    assert!(matches!(echo, ServerEvent::RoomJoin(_)));
    assert_eq!(serde_json::to_value(&echo).unwrap(), frame);

    let members = service.members(RoomName::from("lobby")).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].email, "a@example.com");
}
