// Purpose: Per-hand voice lifecycle on the control thread
// This layer sits above the engine and owns one generator per tracked hand

pub mod manager;
pub mod voice;

pub use manager::{VoiceEvent, VoiceManager};
pub use voice::{Voice, VoiceState};
