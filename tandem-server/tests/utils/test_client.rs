use anyhow::{Context, Result};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::time::Duration;
use tandem_core::{ClientEvent, ConnectionId, JoinRequest, ServerEvent};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

/// Timeout for a single expected relay event (ms).
pub const SIGNAL_TIMEOUT_MS: u64 = 5000;

/// How long to listen before concluding nothing will arrive (ms).
pub const SILENCE_WINDOW_MS: u64 = 300;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Raw WebSocket client speaking the relay's JSON frames.
pub struct TestClient {
    /// Connection id announced by the relay.
    pub id: ConnectionId,
    sink: SplitSink<Socket, Message>,
    stream: SplitStream<Socket>,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let url = format!("ws://{addr}/ws");
        let (socket, _) = tokio_tungstenite::connect_async(url)
            .await
            .context("Failed to connect to relay")?;
        let (sink, stream) = socket.split();

        let mut client = Self {
            id: ConnectionId::from(""),
            sink,
            stream,
        };

        match client.recv().await? {
            ServerEvent::Connected { id } => client.id = id,
            other => anyhow::bail!("Expected connected frame, got {other:?}"),
        }
        Ok(client)
    }

    pub async fn send(&mut self, event: &ClientEvent) -> Result<()> {
        let json = serde_json::to_string(event)?;
        self.send_raw(&json).await
    }

    pub async fn send_raw(&mut self, text: &str) -> Result<()> {
        self.sink
            .send(Message::Text(text.to_owned().into()))
            .await
            .context("Failed to send frame")
    }

    /// Joins `room` and consumes the relay's echo.
    pub async fn join(&mut self, email: &str, room: &str) -> Result<()> {
        self.send(&ClientEvent::RoomJoin(JoinRequest::new(email, room)))
            .await?;

        match self.recv().await? {
            ServerEvent::RoomJoin(echoed)
                if echoed.email == email && echoed.room.as_str() == room =>
            {
                Ok(())
            }
            other => anyhow::bail!("Expected room:join echo, got {other:?}"),
        }
    }

    pub async fn recv(&mut self) -> Result<ServerEvent> {
        self.recv_within(SIGNAL_TIMEOUT_MS)
            .await?
            .context("Timeout waiting for relay event")
    }

    /// Next event, or `None` if nothing arrives within `timeout_ms`.
    pub async fn recv_within(&mut self, timeout_ms: u64) -> Result<Option<ServerEvent>> {
        let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);

        loop {
            let next = tokio::time::timeout_at(deadline, self.stream.next()).await;
            match next {
                Err(_) => return Ok(None),
                Ok(None) => anyhow::bail!("Relay closed the connection"),
                Ok(Some(frame)) => match frame.context("WebSocket error")? {
                    Message::Text(text) => {
                        let event = serde_json::from_str(text.as_str())
                            .context("Relay sent an undecodable frame")?;
                        return Ok(Some(event));
                    }
                    Message::Close(_) => anyhow::bail!("Relay closed the connection"),
                    _ => continue,
                },
            }
        }
    }

    /// Fails if any event arrives within the silence window.
    pub async fn expect_silence(&mut self) -> Result<()> {
        match self.recv_within(SILENCE_WINDOW_MS).await? {
            None => Ok(()),
            Some(event) => anyhow::bail!("Expected no events, got {event:?}"),
        }
    }

    pub async fn close(mut self) -> Result<()> {
        self.sink
            .send(Message::Close(None))
            .await
            .context("Failed to close socket")
    }
}
