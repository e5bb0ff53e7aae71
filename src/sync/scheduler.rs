use std::time::{Duration, Instant, SystemTime};

use tracing::info;

use crate::audio::AudioEngine;
use crate::display::Display;
use crate::playback::{PlaybackController, PlaybackError};
use crate::timeline::{self, Position};

use super::clock::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Not synced yet, or playback gave up.
    Idle,
    /// The anchor is in the future; re-check once at `recheck_at`.
    Waiting { recheck_at: Instant },
    /// Synced; natural track progression takes over from here.
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Waiting { remaining: Duration },
    Started(Position),
}

/// Puts the controller on the shared timeline.
///
/// Syncs once: either the anchor has passed and playback starts at the
/// mapped position, or the scheduler waits for exactly the time left until
/// the anchor and is re-run then. There is no periodic re-sync afterwards.
pub struct SyncScheduler<C, E, D> {
    controller: PlaybackController<E, D>,
    clock: C,
    anchor: SystemTime,
    wrap: bool,
    durations: Vec<Duration>,
    state: SyncState,
}

impl<C: Clock, E: AudioEngine, D: Display> SyncScheduler<C, E, D> {
    pub fn new(controller: PlaybackController<E, D>, clock: C, anchor: SystemTime, wrap: bool) -> Self {
        let durations = controller.playlist().durations();
        Self {
            controller,
            clock,
            anchor,
            wrap,
            durations,
            state: SyncState::Idle,
        }
    }

    /// Time since the anchor, or `Err` with the time still left before it.
    pub fn elapsed(&self) -> Result<Duration, Duration> {
        self.clock
            .now()
            .duration_since(self.anchor)
            .map_err(|e| e.duration())
    }

    pub fn sync(&mut self) -> Result<SyncOutcome, PlaybackError> {
        self.sync_at(Instant::now())
    }

    /// Run the sync decision, with `now` as the monotonic time the re-check
    /// deadline is measured from.
    pub fn sync_at(&mut self, now: Instant) -> Result<SyncOutcome, PlaybackError> {
        match self.elapsed() {
            Err(remaining) => {
                info!(remaining_ms = remaining.as_millis() as u64, "anchor not reached, waiting");
                self.controller.display_mut().waiting(self.anchor);
                self.state = SyncState::Waiting {
                    recheck_at: now + remaining,
                };
                Ok(SyncOutcome::Waiting { remaining })
            }
            Ok(elapsed) => {
                let position = if self.wrap {
                    timeline::locate_wrapped(&self.durations, elapsed)
                } else {
                    timeline::locate(&self.durations, elapsed)
                };
                info!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    index = position.index,
                    offset_ms = position.offset.as_millis() as u64,
                    "synced to timeline"
                );

                self.state = SyncState::Idle;
                self.controller.play_track(position.index, position.offset)?;
                self.state = SyncState::Playing;
                Ok(SyncOutcome::Started(position))
            }
        }
    }

    /// Deadline of the pending re-check, if waiting.
    pub fn next_check(&self) -> Option<Instant> {
        match self.state {
            SyncState::Waiting { recheck_at } => Some(recheck_at),
            _ => None,
        }
    }

    /// Whether the pending re-check should run at `now`. Never true early.
    pub fn is_due(&self, now: Instant) -> bool {
        self.next_check().is_some_and(|at| now >= at)
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn controller(&self) -> &PlaybackController<E, D> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController<E, D> {
        &mut self.controller
    }
}
