mod config;
mod engine;
mod error;
mod link;
mod relay_client;
mod session;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use link::*;
pub use relay_client::*;
pub use session::*;
