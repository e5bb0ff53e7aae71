use std::time::Duration;

use tracing::{debug, info, warn};

use crate::audio::{AudioEngine, EngineEvent};
use crate::display::{Display, NowPlaying, format_clock};
use crate::library::Playlist;

use super::state::{FaultPolicy, PlaybackError, PlaybackState};

/// Drives the audio engine through the playlist.
///
/// Exclusively owns the engine and the current [`PlaybackState`]. Two paths
/// start tracks: [`play_track`](Self::play_track), called by the sync
/// scheduler with a computed position, and natural progression when the
/// engine reports the end of the current track.
pub struct PlaybackController<E, D> {
    engine: E,
    display: D,
    playlist: Playlist,
    policy: FaultPolicy,
    state: Option<PlaybackState>,
    consecutive_faults: usize,
}

impl<E: AudioEngine, D: Display> PlaybackController<E, D> {
    pub fn new(
        engine: E,
        display: D,
        playlist: Playlist,
        policy: FaultPolicy,
    ) -> Result<Self, PlaybackError> {
        if playlist.is_empty() {
            return Err(PlaybackError::EmptyPlaylist);
        }
        Ok(Self {
            engine,
            display,
            playlist,
            policy,
            state: None,
            consecutive_faults: 0,
        })
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn state(&self) -> Option<&PlaybackState> {
        self.state.as_ref()
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Stop what is playing, load track `index` at `start_at` and play it.
    ///
    /// `start_at` must lie inside the track; for a track whose duration is
    /// unknown only the very start is accepted. A track the engine cannot
    /// load is handled by the fault policy.
    pub fn play_track(&mut self, index: usize, start_at: Duration) -> Result<(), PlaybackError> {
        self.check_bounds(index, start_at)?;
        self.consecutive_faults = 0;

        let mut index = index;
        let mut start_at = start_at;
        loop {
            self.engine.stop();
            let path = self.playlist.tracks()[index].path.clone();

            match self.engine.load(&path, start_at) {
                Ok(load) => {
                    self.engine.play();
                    self.state = Some(PlaybackState {
                        index,
                        offset: start_at,
                        load,
                    });
                    info!(index, start_ms = start_at.as_millis() as u64, path = %path.display(), "playing track");
                    self.publish();
                    return Ok(());
                }
                Err(source) => {
                    self.consecutive_faults += 1;
                    warn!(index, error = %source, "track failed to play");

                    match self.policy {
                        FaultPolicy::Halt => {
                            self.halt();
                            return Err(PlaybackError::Fault { index, source });
                        }
                        FaultPolicy::Skip if self.consecutive_faults >= self.playlist.len() => {
                            self.halt();
                            return Err(PlaybackError::Exhausted);
                        }
                        FaultPolicy::Skip => {
                            index = self.next_index(index);
                            start_at = Duration::ZERO;
                        }
                    }
                }
            }
        }
    }

    /// React to one engine notification. Notifications from a load that has
    /// since been replaced are ignored.
    pub fn handle_event(&mut self, event: EngineEvent) -> Result<(), PlaybackError> {
        let Some(state) = self.state else {
            return Ok(());
        };
        if event.load() != state.load {
            debug!(event = ?event, current = state.load.0, "dropping stale engine event");
            return Ok(());
        }

        match event {
            EngineEvent::Progress { position, .. } => {
                let offset = self.clamp_offset(state.index, position);
                self.state = Some(PlaybackState { offset, ..state });
                self.publish();
                Ok(())
            }
            EngineEvent::Ended { .. } => {
                let next = self.next_index(state.index);
                debug!(from = state.index, to = next, "track ended, advancing");
                self.play_track(next, Duration::ZERO)
            }
        }
    }

    /// Feed every pending engine notification through [`handle_event`](Self::handle_event).
    pub fn pump(&mut self) -> Result<(), PlaybackError> {
        while let Some(event) = self.engine.poll_event() {
            self.handle_event(event)?;
        }
        Ok(())
    }

    /// Fade out and stop; used when quitting.
    pub fn shutdown(&mut self, fade_out: Duration) {
        if let Some(state) = self.state {
            let position = self.engine.position();
            info!(index = state.index, position_ms = position.as_millis() as u64, "stopping playback");
        }
        self.engine.fade_out(fade_out);
        self.state = None;
    }

    fn check_bounds(&self, index: usize, start_at: Duration) -> Result<(), PlaybackError> {
        let Some(track) = self.playlist.get(index) else {
            return Err(PlaybackError::IndexOutOfRange {
                index,
                len: self.playlist.len(),
            });
        };

        let in_range = if track.has_known_duration() {
            start_at < track.duration
        } else {
            start_at.is_zero()
        };
        if !in_range {
            return Err(PlaybackError::OffsetOutOfRange {
                index,
                offset: start_at,
                duration: track.duration,
            });
        }
        Ok(())
    }

    /// Keep a reported position inside `[0, duration)`.
    ///
    /// Probed durations are container estimates and can be shorter than the
    /// decoded stream (VBR MP3 in particular). The source keeps playing until
    /// the engine reports its end; only the recorded offset is held just short
    /// of the known duration. Unknown durations are not bounded.
    fn clamp_offset(&self, index: usize, position: Duration) -> Duration {
        let track = &self.playlist.tracks()[index];
        if track.has_known_duration() {
            position.min(track.duration - Duration::from_nanos(1))
        } else {
            position
        }
    }

    fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.playlist.len()
    }

    fn halt(&mut self) {
        self.engine.stop();
        self.state = None;
        self.display.no_content();
    }

    fn publish(&mut self) {
        let Some(state) = self.state else {
            return;
        };
        let track = &self.playlist.tracks()[state.index];
        self.display.now_playing(NowPlaying {
            index: state.index,
            name: track.name.clone(),
            elapsed: format_clock(state.offset),
            total: format_clock(track.duration),
            offset: state.offset,
            length: track.duration,
        });
    }
}
