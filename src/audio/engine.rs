use std::path::Path;
use std::time::Duration;

use super::types::{AudioError, EngineEvent, LoadId};

/// The audio rendering collaborator driven by the playback controller.
///
/// One engine renders one source at a time. Loading a new source replaces the
/// previous one, and from then on only notifications tagged with the new
/// [`LoadId`] are emitted.
pub trait AudioEngine {
    /// Stop whatever is loaded, open `path` and position it at `start_at`.
    /// The source stays paused until [`play`](Self::play).
    fn load(&mut self, path: &Path, start_at: Duration) -> Result<LoadId, AudioError>;

    fn play(&mut self);

    fn stop(&mut self);

    /// Current position inside the loaded source.
    fn position(&self) -> Duration;

    /// Next pending notification, if any. Never blocks.
    fn poll_event(&mut self) -> Option<EngineEvent>;

    /// Fade the current source out over `over`, then stop it.
    fn fade_out(&mut self, over: Duration) {
        let _ = over;
        self.stop();
    }
}
