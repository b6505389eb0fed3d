pub use tandem_core::model::{ClientEvent, ConnectionId, RoomName, ServerEvent};

pub mod model {
    pub use tandem_core::model::*;
}

pub mod utils {
    pub use tandem_core::utils::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use tandem_server::*;
}

#[cfg(feature = "peer")]
pub mod peer {
    pub use tandem_peer::*;
}
