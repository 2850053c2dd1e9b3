pub mod config;
pub mod display; // Read-only readings for the UI
pub mod dsp;
pub mod engine; // Realtime generators and the command ring
pub mod error;
pub mod mapping;
pub mod synth; // Per-hand voice lifecycle
pub mod theremin;
pub mod tracking; // Landmarks to control signals

pub use config::ThereminConfig;
pub use display::HandReading;
pub use error::{AudioError, TrackingError};
pub use theremin::Theremin;
pub use tracking::{HandId, Landmark};

pub const MAX_BLOCK_SIZE: usize = 2048;
