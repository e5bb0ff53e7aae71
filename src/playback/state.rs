use std::time::Duration;

use thiserror::Error;

use crate::audio::{AudioError, LoadId};
use crate::config::FaultPolicySetting;

/// What is playing right now. Owned by the controller, recomputed on sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackState {
    pub index: usize,
    /// Offset into the current track.
    pub offset: Duration,
    /// Engine load this state belongs to; notifications from other loads are stale.
    pub load: LoadId,
}

/// Reaction to a track the engine cannot load.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FaultPolicy {
    /// Advance to the next track at offset 0. After a full round of
    /// consecutive failures playback stops.
    #[default]
    Skip,
    /// Stop playback on the first failure.
    Halt,
}

impl From<FaultPolicySetting> for FaultPolicy {
    fn from(s: FaultPolicySetting) -> Self {
        match s {
            FaultPolicySetting::Skip => Self::Skip,
            FaultPolicySetting::Halt => Self::Halt,
        }
    }
}

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("cannot build a playback controller for an empty playlist")]
    EmptyPlaylist,

    #[error("track index {index} is out of range for a playlist of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("start offset {offset:?} lies outside track {index} (length {duration:?})")]
    OffsetOutOfRange {
        index: usize,
        offset: Duration,
        duration: Duration,
    },

    #[error("track {index} failed to play: {source}")]
    Fault {
        index: usize,
        #[source]
        source: AudioError,
    },

    #[error("every track in the playlist failed to play")]
    Exhausted,
}
