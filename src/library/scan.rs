use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::{Playlist, Track};
use super::name::name_from_fields;
use super::probe::DurationProbe;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("track source {path:?} is unavailable: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Enumerates the track resources that make up the playlist.
///
/// The returned order is the playlist order, so it must be the same on
/// every client that sees the same files.
pub trait TrackSource {
    fn list(&self) -> Result<Vec<PathBuf>, LibraryError>;
}

/// Lists audio files below a directory, sorted by their path relative to it.
pub struct DirectorySource<'a> {
    root: PathBuf,
    settings: &'a LibrarySettings,
}

impl<'a> DirectorySource<'a> {
    pub fn new(root: impl Into<PathBuf>, settings: &'a LibrarySettings) -> Self {
        Self {
            root: root.into(),
            settings,
        }
    }
}

impl TrackSource for DirectorySource<'_> {
    fn list(&self) -> Result<Vec<PathBuf>, LibraryError> {
        // WalkDir swallows a missing root into its iterator; check it up front
        // so an unreachable location is reported instead of looking empty.
        std::fs::read_dir(&self.root).map_err(|source| LibraryError::SourceUnavailable {
            path: self.root.clone(),
            source,
        })?;

        let settings = self.settings;
        let mut walker = WalkDir::new(&self.root).follow_links(settings.follow_links);

        // Non-recursive = only the root directory.
        let depth_cap = if settings.recursive {
            settings.max_depth
        } else {
            Some(1)
        };
        if let Some(d) = depth_cap {
            walker = walker.max_depth(d);
        }

        let mut found: Vec<(String, PathBuf)> = Vec::new();
        for entry in walker
            .into_iter()
            .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if path.is_file() && is_audio_file(path, settings) {
                let key = sort_key(&self.root, path);
                found.push((key, path.to_path_buf()));
            }
        }

        found.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(found.into_iter().map(|(_, p)| p).collect())
    }
}

/// Enumerate `source` and probe every entry into a playlist.
///
/// An unavailable source yields an empty playlist; a track whose duration
/// cannot be resolved is kept with a zero duration.
pub fn load_playlist(
    source: &dyn TrackSource,
    probe: &dyn DurationProbe,
    settings: &LibrarySettings,
) -> Playlist {
    let paths = match source.list() {
        Ok(paths) => paths,
        Err(e) => {
            warn!(error = %e, "track source unavailable, continuing with an empty playlist");
            return Playlist::default();
        }
    };

    let tracks: Vec<Track> = paths
        .into_iter()
        .map(|path| {
            let probed = probe.probe(&path);
            let name = name_from_fields(
                &path,
                &probed,
                &settings.name_fields,
                &settings.name_separator,
            );
            Track {
                path,
                name,
                duration: probed.duration,
            }
        })
        .collect();

    let unresolved = tracks.iter().filter(|t| !t.has_known_duration()).count();
    info!(tracks = tracks.len(), unresolved, "playlist loaded");
    Playlist::new(tracks)
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Platform-independent ordering key: relative components joined with `/`.
fn sort_key(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
