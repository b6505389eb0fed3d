use std::time::Duration;
use tandem_core::IceServerConfig;

pub const DEFAULT_GATHER_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_NEGOTIATION_TIMEOUT: Duration = Duration::from_secs(30);

/// When a local description is handed out relative to ICE gathering.
///
/// Applied to offers and answers alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IceStrategy {
    /// Wait for gathering to finish (at most `timeout`) and send the
    /// description with every candidate embedded.
    GatherThenSend { timeout: Duration },
    /// Send the description right away; candidates follow one by one.
    Trickle,
}

impl Default for IceStrategy {
    fn default() -> Self {
        IceStrategy::GatherThenSend {
            timeout: DEFAULT_GATHER_TIMEOUT,
        }
    }
}

/// Settings for one peer link and the engine behind it.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    pub ice_servers: Vec<IceServerConfig>,
    pub ice_strategy: IceStrategy,
    /// Data channel opened with the connection, if any.
    pub data_channel_label: Option<String>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig::default_stun()],
            ice_strategy: IceStrategy::default(),
            data_channel_label: Some("chat".to_owned()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long an offer may go unanswered before the link is declared
    /// failed. `None` waits forever.
    pub negotiation_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            negotiation_timeout: Some(DEFAULT_NEGOTIATION_TIMEOUT),
        }
    }
}
