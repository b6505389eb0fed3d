use anyhow::{Context, Result};
use std::time::Duration;
use tokio::sync::mpsc;

use tandem_core::{IceCandidate, Payload};
use tandem_peer::{ConnectionLink, IceStrategy, SessionEvent, SessionHandle};

use super::mock_engine::MockEngine;

/// Timeout for a single expected event (ms).
pub const SIGNAL_TIMEOUT_MS: u64 = 5000;

/// Timeout for a real peer connection to come up (ms).
pub const CONNECTION_TIMEOUT_MS: u64 = 15000;

/// Link over a fresh mock engine, plus a handle on the same engine.
pub fn mock_link(strategy: IceStrategy) -> (ConnectionLink<MockEngine>, MockEngine) {
    let engine = MockEngine::new();
    (ConnectionLink::new(engine.clone(), strategy), engine)
}

pub fn candidate(n: u32) -> IceCandidate {
    IceCandidate {
        candidate: format!("candidate:{n} 1 udp 2122260223 10.0.0.{n} 5000{n} typ host"),
        sdp_mid: Some("0".to_owned()),
        sdp_m_line_index: Some(0),
        username_fragment: None,
    }
}

pub fn candidate_payload(n: u32) -> Payload {
    candidate(n).to_payload()
}

pub async fn recv_within<T>(rx: &mut mpsc::UnboundedReceiver<T>, timeout_ms: u64) -> Option<T> {
    tokio::time::timeout(Duration::from_millis(timeout_ms), rx.recv())
        .await
        .ok()
        .flatten()
}

/// Waits until the session emits an event matching `pred`, skipping others.
pub async fn wait_for_event<E, F>(
    handle: &mut SessionHandle<E>,
    timeout_ms: u64,
    mut pred: F,
) -> Result<SessionEvent>
where
    E: tandem_peer::RtcEngine,
    F: FnMut(&SessionEvent) -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        let event = tokio::time::timeout_at(deadline, handle.next_event())
            .await
            .context("Timeout waiting for session event")?
            .context("Session ended")?;
        tracing::debug!("[SignalHelper] Session event: {:?}", event);
        if pred(&event) {
            return Ok(event);
        }
    }
}
