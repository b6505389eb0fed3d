use tandem_core::{ConnectionId, Member, RoomName, ServerEvent};
use tandem_server::RegistryCommand;

use crate::integration::{create_test_registry, init_tracing, members_of};

async fn join_and_leave(notify_on_leave: bool) -> Vec<ServerEvent> {
    let (cmd_tx, _delivered_rx, signaling) = create_test_registry(notify_on_leave);
    let leaver = Member::new("leaver@example.com", ConnectionId::new());
    let stayer = Member::new("stayer@example.com", ConnectionId::new());

    for member in [&stayer, &leaver] {
        cmd_tx
            .send(RegistryCommand::join(RoomName::from("lobby"), member.clone()))
            .await
            .unwrap();
    }
    cmd_tx
        .send(RegistryCommand::Disconnect {
            id: leaver.id.clone(),
        })
        .await
        .unwrap();
    members_of(&cmd_tx, "lobby").await;

    signaling
        .events_for(&stayer.id)
        .await
        .into_iter()
        .filter(|e| matches!(e, ServerEvent::UserLeft { id } if *id == leaver.id))
        .collect()
}

#[tokio::test]
async fn test_leave_is_silent_by_default() {
    init_tracing();
    assert!(join_and_leave(false).await.is_empty());
}

#[tokio::test]
async fn test_leave_is_announced_when_enabled() {
    init_tracing();
    assert_eq!(join_and_leave(true).await.len(), 1);
}
