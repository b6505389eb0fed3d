mod connection;
mod description;
mod ice;
mod member;
mod room;
mod signaling;

pub use connection::ConnectionId;
pub use description::{IceCandidate, Payload, PayloadError, SdpKind, SessionDescription};
pub use ice::IceServerConfig;
pub use member::Member;
pub use room::{JoinRequest, RoomName};
pub use signaling::{ClientEvent, ServerEvent};
