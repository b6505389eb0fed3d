pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_2: &str = "stun:global.stun.twilio.com:3478";

/// Port the relay listens on when nothing else is configured.
pub const DEFAULT_RELAY_PORT: u16 = 3001;

/// Path of the signaling WebSocket endpoint.
pub const SIGNALING_PATH: &str = "/ws";
