use crate::error::RelayError;
use crate::signaling::SignalingService;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tandem_core::{ClientEvent, ConnectionId, ServerEvent};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, service))
}

async fn handle_socket(socket: WebSocket, service: SignalingService) {
    let id = ConnectionId::new();
    info!("New WebSocket connection: {}", id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    service.add_connection(id.clone(), tx);
    if let Err(e) = service.send_signal(&id, &ServerEvent::Connected { id: id.clone() }) {
        error!("Failed to greet {}: {}", id, e);
    }

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();
        let id = id.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => match service.dispatch(&id, event).await {
                            Ok(()) => {}
                            Err(RelayError::UnreachablePeer(to)) => {
                                debug!("Dropping event from {} for unknown connection {}", id, to);
                            }
                            Err(e) => {
                                error!("Relay failure for {}: {}", id, e);
                                break;
                            }
                        },
                        Err(e) => warn!("Invalid signaling frame from {}: {}", id, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    if let Err(e) = service.disconnect(&id).await {
        error!("Failed to unregister {}: {}", id, e);
    }
    info!("WebSocket disconnected: {}", id);
}
