//! Playback controller: loads tracks into the audio engine and follows
//! them from one to the next.

mod controller;
mod state;

pub use controller::PlaybackController;
pub use state::{FaultPolicy, PlaybackError, PlaybackState};
