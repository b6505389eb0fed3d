mod engine_event;
mod rtc_engine;
mod webrtc_engine;

pub use engine_event::*;
pub use rtc_engine::*;
pub use webrtc_engine::*;
