use std::path::Path;
use std::time::Duration;

use lofty::prelude::*;
use tracing::{debug, warn};

/// What a probe learned about a file. Tags are optional extras; the
/// duration is what the timeline is built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Probed {
    /// `Duration::ZERO` when the file could not be read.
    pub duration: Duration,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

/// Resolves the playable duration of a track.
///
/// Implementations never fail: an unreadable file resolves to
/// `Duration::ZERO` so the playlist can always be completed.
pub trait DurationProbe {
    fn probe(&self, path: &Path) -> Probed;
}

/// Reads container properties and tags with `lofty`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyProbe;

impl DurationProbe for LoftyProbe {
    fn probe(&self, path: &Path) -> Probed {
        let tagged = match lofty::read_from_path(path) {
            Ok(t) => t,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not resolve duration, treating track as zero-length");
                return Probed::default();
            }
        };

        let mut probed = Probed {
            duration: tagged.properties().duration(),
            ..Probed::default()
        };

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            probed.title = tag.title().map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
            probed.artist = tag.artist().map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
            probed.album = tag.album().map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        }

        debug!(path = %path.display(), duration_ms = probed.duration.as_millis() as u64, "probed track");
        probed
    }
}
