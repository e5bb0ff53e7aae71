//! Audio subsystem: the engine collaborator and its `rodio` implementation.

mod engine;
mod player;
mod sink;
mod types;

pub use engine::AudioEngine;
pub use player::RodioEngine;
pub use types::{AudioError, EngineEvent, LoadId};
