//! Display collaborator: what the listener is shown.
//!
//! Playback and sync publish through the [`Display`] trait. The runtime uses
//! [`ScreenHandle`], a shared snapshot the terminal UI and MPRIS read from.

use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

/// Now-playing details as shown to the listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub index: usize,
    pub name: String,
    /// Elapsed time in the current track, `M:SS`.
    pub elapsed: String,
    /// Track length, `M:SS`.
    pub total: String,
    /// Unformatted offset and length, for consumers that need numbers.
    pub offset: Duration,
    pub length: Duration,
}

pub trait Display {
    fn now_playing(&mut self, now: NowPlaying);
    /// Playback has not started yet; it will at `anchor`.
    fn waiting(&mut self, anchor: SystemTime);
    /// There is nothing that can be played.
    fn no_content(&mut self);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Loading,
    Waiting {
        anchor: SystemTime,
    },
    NoContent,
    Playing(NowPlaying),
}

/// Shared, cloneable [`Display`] writing into a [`Screen`] snapshot.
#[derive(Debug, Clone, Default)]
pub struct ScreenHandle {
    screen: Arc<Mutex<Screen>>,
}

impl ScreenHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current screen state.
    pub fn snapshot(&self) -> Screen {
        self.screen
            .lock()
            .map(|s| s.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn set(&self, screen: Screen) {
        if let Ok(mut s) = self.screen.lock() {
            *s = screen;
        }
    }
}

impl Display for ScreenHandle {
    fn now_playing(&mut self, now: NowPlaying) {
        self.set(Screen::Playing(now));
    }

    fn waiting(&mut self, anchor: SystemTime) {
        self.set(Screen::Waiting { anchor });
    }

    fn no_content(&mut self) {
        self.set(Screen::NoContent);
    }
}

/// Format `d` as `M:SS`, truncating partial seconds. Minutes are not capped.
pub fn format_clock(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
