use crate::config::LinkConfig;
use crate::engine::{EngineEvent, RtcEngine};
use crate::link::ConnectionLink;
use anyhow::{Result, bail};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tandem_core::{IceCandidate, SdpKind, SessionDescription};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

/// Buffer for engine events between the webrtc callbacks and the session loop.
pub const ENGINE_EVENT_CAPACITY: usize = 64;

/// [`RtcEngine`] backed by a webrtc-rs peer connection.
pub struct WebRtcEngine {
    peer_connection: Arc<RTCPeerConnection>,
    /// Open data channels by label.
    channels: Arc<DashMap<String, Arc<RTCDataChannel>>>,
    data_channel_label: Option<String>,
}

impl WebRtcEngine {
    pub async fn new(config: &LinkConfig, event_tx: mpsc::Sender<EngineEvent>) -> Result<Self> {
        let mut media = MediaEngine::default();
        media.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut media)?;

        let api = APIBuilder::new()
            .with_media_engine(media)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: config
                .ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                })
                .collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);
        let channels = Arc::new(DashMap::new());

        let state_tx = event_tx.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();

                Box::pin(async move {
                    info!("Peer connection state changed: {}", s);
                    let event = match s {
                        RTCPeerConnectionState::Connected => EngineEvent::Connected,
                        RTCPeerConnectionState::Failed | RTCPeerConnectionState::Disconnected => {
                            EngineEvent::Failed
                        }
                        _ => return,
                    };
                    let _ = tx.send(event).await;
                })
            },
        ));

        let ice_tx = event_tx.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();

            Box::pin(async move {
                // `None` marks the end of gathering.
                let Some(candidate) = c else { return };
                match candidate.to_json() {
                    Ok(init) => {
                        let _ = tx.send(EngineEvent::LocalCandidate(from_rtc_candidate(init))).await;
                    }
                    Err(e) => warn!("Failed to serialize local ICE candidate: {}", e),
                }
            })
        }));

        let nego_tx = event_tx.clone();
        peer_connection.on_negotiation_needed(Box::new(move || {
            let tx = nego_tx.clone();
            Box::pin(async move {
                let _ = tx.send(EngineEvent::NegotiationNeeded).await;
            })
        }));

        let dc_tx = event_tx.clone();
        let dc_channels = channels.clone();
        peer_connection.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
            let tx = dc_tx.clone();
            let channels = dc_channels.clone();
            Box::pin(async move {
                debug!("Remote opened data channel '{}'", dc.label());
                watch_channel(&dc, channels, tx);
            })
        }));

        if let Some(label) = &config.data_channel_label {
            let channel = peer_connection.create_data_channel(label, None).await?;
            watch_channel(&channel, channels.clone(), event_tx);
        }

        Ok(Self {
            peer_connection,
            channels,
            data_channel_label: config.data_channel_label.clone(),
        })
    }

    pub fn peer_connection(&self) -> &Arc<RTCPeerConnection> {
        &self.peer_connection
    }
}

fn watch_channel(
    channel: &Arc<RTCDataChannel>,
    channels: Arc<DashMap<String, Arc<RTCDataChannel>>>,
    tx: mpsc::Sender<EngineEvent>,
) {
    let label = channel.label().to_owned();

    let open_tx = tx.clone();
    let open_label = label.clone();
    let ready = channel.clone();
    channel.on_open(Box::new(move || {
        let tx = open_tx.clone();
        let label = open_label.clone();
        channels.insert(label.clone(), ready.clone());
        Box::pin(async move {
            info!("Data channel '{}' open", label);
            let _ = tx.send(EngineEvent::DataChannelOpen(label)).await;
        })
    }));

    channel.on_message(Box::new(move |msg: DataChannelMessage| {
        let tx = tx.clone();
        let label = label.clone();
        Box::pin(async move {
            let data = Bytes::from(msg.data.to_vec());
            let _ = tx
                .send(EngineEvent::DataChannelMessage { label, data })
                .await;
        })
    }));
}

/// Builds a link over a fresh [`WebRtcEngine`], plus the receiver for its events.
pub async fn new_link(
    config: &LinkConfig,
) -> Result<(ConnectionLink<WebRtcEngine>, mpsc::Receiver<EngineEvent>)> {
    let (event_tx, event_rx) = mpsc::channel(ENGINE_EVENT_CAPACITY);
    let engine = WebRtcEngine::new(config, event_tx).await?;
    Ok((ConnectionLink::new(engine, config.ice_strategy), event_rx))
}

fn to_rtc_description(description: SessionDescription) -> Result<RTCSessionDescription> {
    Ok(match description.kind {
        SdpKind::Offer => RTCSessionDescription::offer(description.sdp)?,
        SdpKind::Answer => RTCSessionDescription::answer(description.sdp)?,
    })
}

fn from_rtc_description(description: RTCSessionDescription) -> Result<SessionDescription> {
    match description.sdp_type {
        RTCSdpType::Offer => Ok(SessionDescription::offer(description.sdp)),
        RTCSdpType::Answer => Ok(SessionDescription::answer(description.sdp)),
        other => bail!("Unsupported session description type: {}", other),
    }
}

fn to_rtc_candidate(candidate: IceCandidate) -> RTCIceCandidateInit {
    RTCIceCandidateInit {
        candidate: candidate.candidate,
        sdp_mid: candidate.sdp_mid,
        sdp_mline_index: candidate.sdp_m_line_index,
        username_fragment: candidate.username_fragment,
    }
}

fn from_rtc_candidate(init: RTCIceCandidateInit) -> IceCandidate {
    IceCandidate {
        candidate: init.candidate,
        sdp_mid: init.sdp_mid,
        sdp_m_line_index: init.sdp_mline_index,
        username_fragment: init.username_fragment,
    }
}

#[async_trait]
impl RtcEngine for WebRtcEngine {
    async fn create_offer(&self) -> Result<SessionDescription> {
        let offer = self.peer_connection.create_offer(None).await?;
        from_rtc_description(offer)
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        let answer = self.peer_connection.create_answer(None).await?;
        from_rtc_description(answer)
    }

    async fn set_local_description(&self, description: SessionDescription) -> Result<()> {
        let description = to_rtc_description(description)?;
        self.peer_connection.set_local_description(description).await?;
        Ok(())
    }

    async fn set_remote_description(&self, description: SessionDescription) -> Result<()> {
        let description = to_rtc_description(description)?;
        self.peer_connection.set_remote_description(description).await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        self.peer_connection
            .add_ice_candidate(to_rtc_candidate(candidate))
            .await?;
        Ok(())
    }

    async fn wait_for_gathering(&self, timeout: Duration) -> bool {
        let mut done = self.peer_connection.gathering_complete_promise().await;
        tokio::time::timeout(timeout, done.recv()).await.is_ok()
    }

    async fn local_description(&self) -> Option<SessionDescription> {
        let description = self.peer_connection.local_description().await?;
        from_rtc_description(description).ok()
    }

    async fn send_message(&self, data: Bytes) -> Result<()> {
        // Prefer our own channel; otherwise whichever one the remote opened.
        let channel = self
            .data_channel_label
            .as_ref()
            .and_then(|label| self.channels.get(label).map(|c| c.value().clone()))
            .or_else(|| self.channels.iter().next().map(|c| c.value().clone()));

        let Some(channel) = channel else {
            bail!("No open data channel");
        };
        channel.send(&data).await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.channels.clear();
        self.peer_connection.close().await?;
        Ok(())
    }
}
