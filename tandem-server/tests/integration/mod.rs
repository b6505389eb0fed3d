pub mod registry_tests;

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tracing::Level;

use tandem_core::{Member, RoomName};
use tandem_server::{RegistryCommand, RegistryTask, RelayConfig, SignalingService, router};

use crate::utils::{Delivered, MockSignalingOutput};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Registry task wired to a recording output instead of sockets.
pub fn create_test_registry(
    notify_on_leave: bool,
) -> (
    mpsc::Sender<RegistryCommand>,
    mpsc::UnboundedReceiver<Delivered>,
    MockSignalingOutput,
) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<RegistryCommand>(100);
    let (signaling, delivered_rx) = MockSignalingOutput::new();

    let task = RegistryTask::new(cmd_rx, Arc::new(signaling.clone()), notify_on_leave);
    tokio::spawn(async move {
        task.run().await;
    });

    (cmd_tx, delivered_rx, signaling)
}

/// Members of `room` once every command sent before this call has been applied.
pub async fn members_of(cmd_tx: &mpsc::Sender<RegistryCommand>, room: &str) -> Vec<Member> {
    let (reply, rx) = oneshot::channel();
    cmd_tx
        .send(RegistryCommand::Members {
            room: RoomName::from(room),
            reply,
        })
        .await
        .expect("Registry task died");
    rx.await.expect("Registry dropped the reply")
}

/// Starts a relay on an ephemeral local port and returns its address and
/// service handle.
pub async fn spawn_relay(config: RelayConfig) -> (SocketAddr, SignalingService) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");

    let service = SignalingService::spawn(config.registry_capacity, config.notify_on_leave);
    let app = router(service.clone(), &config).expect("Invalid relay config");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Relay stopped");
    });

    (addr, service)
}
