mod connection_link;
mod negotiation_state;

pub use connection_link::*;
pub use negotiation_state::*;
