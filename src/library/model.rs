use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub path: PathBuf,
    /// Human-readable name built from `library.name_fields`.
    pub name: String,
    /// Playable duration; `Duration::ZERO` when it could not be resolved.
    pub duration: Duration,
}

impl Track {
    pub fn has_known_duration(&self) -> bool {
        !self.duration.is_zero()
    }
}

/// Ordered, immutable list of tracks. The order defines the shared timeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Durations in playlist order, as consumed by the time mapper.
    pub fn durations(&self) -> Vec<Duration> {
        self.tracks.iter().map(|t| t.duration).collect()
    }
}
