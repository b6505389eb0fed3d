use serde::{Deserialize, Serialize};

use crate::utils::{DEFAULT_STUN_ADDR, DEFAULT_STUN_ADDR_2};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun(urls: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
            username: None,
            credential: None,
        }
    }

    /// Public STUN servers used when the caller configures none.
    pub fn default_stun() -> Self {
        Self::stun([DEFAULT_STUN_ADDR, DEFAULT_STUN_ADDR_2])
    }
}
