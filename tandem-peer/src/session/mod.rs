mod session_command;
mod session_coordinator;
mod session_event;
mod session_handle;
mod signaling_sink;

pub use session_command::*;
pub use session_coordinator::*;
pub use session_event::*;
pub use session_handle::*;
pub use signaling_sink::*;
