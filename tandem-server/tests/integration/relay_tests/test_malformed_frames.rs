use tandem_server::RelayConfig;

use crate::integration::{init_tracing, spawn_relay};
use crate::utils::TestClient;

#[tokio::test]
async fn test_malformed_frames_are_dropped() {
    init_tracing();

    let (addr, _service) = spawn_relay(RelayConfig::default()).await;
    let mut client = TestClient::connect(addr).await.unwrap();

    client.send_raw("definitely not json").await.unwrap();
    client
        .send_raw(r#"{"event":"user:call","data":{"offer":"missing target"}}"#)
        .await
        .unwrap();
    client
        .send_raw(r#"{"event":"room:leave","data":{}}"#)
        .await
        .unwrap();

    client.expect_silence().await.unwrap();
    client
        .join("still@example.com", "alive")
        .await
        .expect("handler survives malformed frames");
}
