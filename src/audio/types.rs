//! Audio-related small types.
//!
//! This module defines the load generation tag, the notifications an
//! engine emits and the engine error type.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Generation of a source loaded into the engine.
///
/// Every successful `load` returns a fresh id; notifications carry the id of
/// the load they belong to so listeners can drop ones from a superseded
/// source.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadId(pub u64);

impl LoadId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Playback position moved (emitted at most once per whole second).
    Progress { load: LoadId, position: Duration },
    /// The loaded source played to its end.
    Ended { load: LoadId },
}

impl EngineEvent {
    pub fn load(&self) -> LoadId {
        match self {
            Self::Progress { load, .. } | Self::Ended { load } => *load,
        }
    }
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),

    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },
}
