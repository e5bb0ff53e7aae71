use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::audio::{AudioEngine, AudioError};
use crate::config;
use crate::display::Display;
use crate::library::Playlist;
use crate::playback::{FaultPolicy, PlaybackController};
use crate::sync::{Clock, SyncOutcome, SyncScheduler, anchor_instant};

/// What the event loop drives.
pub enum Session<C, E, D> {
    /// Nothing to play. No engine was opened and nothing ever will be.
    NoContent,
    Ready(SyncScheduler<C, E, D>),
}

impl<C: Clock, E: AudioEngine, D: Display> Session<C, E, D> {
    /// One loop iteration: run a due re-check, then drain engine events.
    pub fn tick(&mut self, now: Instant) {
        let Session::Ready(scheduler) = self else {
            return;
        };
        if scheduler.is_due(now) {
            if let Err(e) = scheduler.sync_at(now) {
                warn!(error = %e, "sync failed");
            }
        }
        if let Err(e) = scheduler.controller_mut().pump() {
            warn!(error = %e, "playback stopped");
        }
    }

    pub fn next_check(&self) -> Option<Instant> {
        match self {
            Session::Ready(scheduler) => scheduler.next_check(),
            Session::NoContent => None,
        }
    }

    pub fn shutdown(&mut self, fade_out: Duration) {
        if let Session::Ready(scheduler) = self {
            scheduler.controller_mut().shutdown(fade_out);
        }
    }
}

/// Wire the playlist to an engine and run the first sync.
///
/// An empty playlist shows "no content" and never opens the engine. Only a
/// failure to open the engine is returned; playback errors are logged and
/// leave the display showing "no content".
pub fn build_session<C, E, D, F>(
    playlist: Playlist,
    open_engine: F,
    mut display: D,
    settings: &config::Settings,
    clock: C,
) -> anyhow::Result<Session<C, E, D>>
where
    C: Clock,
    E: AudioEngine,
    D: Display,
    F: FnOnce() -> Result<E, AudioError>,
{
    if playlist.is_empty() {
        info!("no playable tracks");
        display.no_content();
        return Ok(Session::NoContent);
    }

    let engine = open_engine()?;
    let policy = FaultPolicy::from(settings.playback.fault_policy);
    let controller = PlaybackController::new(engine, display, playlist, policy)?;

    let anchor = anchor_instant(settings.sync.anchor_unix);
    let mut scheduler = SyncScheduler::new(controller, clock, anchor, settings.sync.wrap_timeline);
    match scheduler.sync() {
        Ok(SyncOutcome::Started(position)) => {
            info!(index = position.index, "joined the timeline");
        }
        Ok(SyncOutcome::Waiting { remaining }) => {
            info!(remaining_s = remaining.as_secs(), "timeline has not started yet");
        }
        Err(e) => warn!(error = %e, state = ?scheduler.state(), "initial sync failed"),
    }

    Ok(Session::Ready(scheduler))
}
