use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use tandem_core::{IceCandidate, SessionDescription};

/// The browser-style RTC primitive a link negotiates through.
///
/// Implementations report asynchronous happenings (gathered candidates,
/// connection state) through the [`EngineEvent`](crate::EngineEvent) channel
/// they were built with.
#[async_trait]
pub trait RtcEngine: Send + Sync + 'static {
    async fn create_offer(&self) -> Result<SessionDescription>;

    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn set_local_description(&self, description: SessionDescription) -> Result<()>;

    async fn set_remote_description(&self, description: SessionDescription) -> Result<()>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()>;

    /// Waits until local ICE gathering completes. Returns `false` if
    /// `timeout` elapsed first.
    async fn wait_for_gathering(&self, timeout: Duration) -> bool;

    /// Current local description, including any candidates gathered so far.
    async fn local_description(&self) -> Option<SessionDescription>;

    /// Sends `data` over the open data channel.
    async fn send_message(&self, data: Bytes) -> Result<()>;

    async fn close(&self) -> Result<()>;
}
