mod registry_command;
mod registry_task;
mod room_registry;

pub use registry_command::*;
pub use registry_task::*;
pub use room_registry::*;
