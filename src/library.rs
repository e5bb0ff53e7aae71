//! Track source and duration probing.
//!
//! Builds the immutable [`Playlist`] the shared timeline is derived from:
//! enumerate the configured location, then probe each entry's duration.

mod model;
mod name;
mod probe;
mod scan;

pub use model::{Playlist, Track};
pub use probe::{DurationProbe, LoftyProbe, Probed};
pub use scan::{DirectorySource, LibraryError, TrackSource, load_playlist};
