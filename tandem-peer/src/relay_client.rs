use crate::session::{RelayChannel, SignalingSink};
use anyhow::{Context, Result, bail};
use futures::{SinkExt, Stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tandem_core::{ClientEvent, ConnectionId, JoinRequest, RoomName, ServerEvent};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, error, info, warn};

/// How long to wait for the relay to announce our connection id.
pub const GREETING_TIMEOUT: Duration = Duration::from_secs(10);

/// WebSocket connection to the signaling relay.
///
/// Cloning shares the connection. The socket is closed once every clone is
/// dropped.
#[derive(Clone)]
pub struct RelayClient {
    id: ConnectionId,
    outgoing: mpsc::UnboundedSender<ClientEvent>,
}

impl RelayClient {
    /// Connects to `url` (e.g. `ws://127.0.0.1:3001/ws`) and waits for the
    /// relay's `connected` frame. Returns the client and the stream of
    /// everything the relay sends afterwards.
    pub async fn connect(url: &str) -> Result<(Self, mpsc::UnboundedReceiver<ServerEvent>)> {
        let (socket, _) = tokio_tungstenite::connect_async(url)
            .await
            .with_context(|| format!("Failed to connect to relay at {url}"))?;
        let (mut sink, mut stream) = socket.split();

        let id = tokio::time::timeout(GREETING_TIMEOUT, read_greeting(&mut stream))
            .await
            .context("Timed out waiting for the relay greeting")??;
        info!("Connected to relay as {}", id);

        let (outgoing, mut outgoing_rx) = mpsc::unbounded_channel::<ClientEvent>();
        let (incoming_tx, incoming) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(event) = outgoing_rx.recv().await {
                let json = match serde_json::to_string(&event) {
                    Ok(json) => json,
                    Err(e) => {
                        error!("Failed to encode {}: {}", event.name(), e);
                        continue;
                    }
                };
                if sink.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
            let _ = sink.close().await;
        });

        tokio::spawn(async move {
            while let Some(frame) = stream.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        match serde_json::from_str::<ServerEvent>(text.as_str()) {
                            Ok(event) => {
                                debug!("Relay -> {}", event.name());
                                if incoming_tx.send(event).is_err() {
                                    break;
                                }
                            }
                            Err(e) => warn!("Ignoring undecodable relay frame: {}", e),
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Relay connection error: {}", e);
                        break;
                    }
                }
            }
            info!("Relay connection closed");
        });

        Ok((Self { id, outgoing }, incoming))
    }

    /// Connects and packages both directions for [`attach`](crate::attach).
    pub async fn connect_channel(url: &str) -> Result<(Self, RelayChannel)> {
        let (client, events) = Self::connect(url).await?;
        let channel = RelayChannel {
            sink: Arc::new(client.clone()),
            events,
        };
        Ok((client, channel))
    }

    /// Our connection id as assigned by the relay.
    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    pub fn join(&self, email: impl Into<String>, room: impl Into<RoomName>) {
        self.send(ClientEvent::RoomJoin(JoinRequest::new(email, room)));
    }
}

async fn read_greeting<S>(stream: &mut S) -> Result<ConnectionId>
where
    S: Stream<Item = Result<Message, WsError>> + Unpin,
{
    while let Some(frame) = stream.next().await {
        match frame.context("WebSocket error before greeting")? {
            Message::Text(text) => {
                return match serde_json::from_str::<ServerEvent>(text.as_str()) {
                    Ok(ServerEvent::Connected { id }) => Ok(id),
                    Ok(other) => bail!("Expected connected frame, got {}", other.name()),
                    Err(e) => Err(e).context("Relay sent an undecodable greeting"),
                };
            }
            Message::Close(_) => break,
            _ => continue,
        }
    }
    bail!("Relay closed the connection before greeting")
}

impl SignalingSink for RelayClient {
    fn send(&self, event: ClientEvent) {
        let name = event.name();
        if self.outgoing.send(event).is_err() {
            warn!("Relay connection is closed; dropping {}", name);
        }
    }
}
