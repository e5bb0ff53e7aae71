use std::path::Path;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::debug;

use super::engine::AudioEngine;
use super::sink::{create_sink_at, fade_out_sink};
use super::types::{AudioError, EngineEvent, LoadId};

/// [`AudioEngine`] backed by the default `rodio` output device.
///
/// Rendering happens on rodio's mixer thread; this type only swaps sinks and
/// turns sink state into notifications when polled.
pub struct RodioEngine {
    stream: OutputStream,
    sink: Option<Sink>,
    /// Where the current sink was started; `Sink::get_pos` counts from there.
    base: Duration,
    load: LoadId,
    playing: bool,
    notifier: Notifier,
}

impl RodioEngine {
    pub fn open_default() -> Result<Self, AudioError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| AudioError::NoOutputDevice(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            base: Duration::ZERO,
            load: LoadId(0),
            playing: false,
            notifier: Notifier::default(),
        })
    }
}

impl AudioEngine for RodioEngine {
    fn load(&mut self, path: &Path, start_at: Duration) -> Result<LoadId, AudioError> {
        self.stop();

        let sink = create_sink_at(&self.stream, path, start_at)?;
        self.sink = Some(sink);
        self.base = start_at;
        self.load = self.load.next();
        self.notifier.reset();
        debug!(path = %path.display(), start_ms = start_at.as_millis() as u64, load = self.load.0, "source loaded");
        Ok(self.load)
    }

    fn play(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.play();
            self.playing = true;
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.playing = false;
    }

    fn position(&self) -> Duration {
        self.sink
            .as_ref()
            .map_or(Duration::ZERO, |s| self.base + s.get_pos())
    }

    fn poll_event(&mut self) -> Option<EngineEvent> {
        let sink = self.sink.as_ref()?;
        if !self.playing {
            return None;
        }
        let position = self.base + sink.get_pos();
        self.notifier.observe(self.load, position, sink.empty())
    }

    fn fade_out(&mut self, over: Duration) {
        if let Some(s) = self.sink.as_ref() {
            if self.playing {
                fade_out_sink(s, over);
            }
        }
        self.stop();
    }
}

/// Turns polled sink state into at most one notification per poll.
///
/// `Ended` is latched so a drained sink reports it once per load; progress is
/// reported whenever the whole-second position changes.
#[derive(Debug, Default)]
pub(super) struct Notifier {
    last_second: Option<u64>,
    ended: bool,
}

impl Notifier {
    pub(super) fn reset(&mut self) {
        self.last_second = None;
        self.ended = false;
    }

    pub(super) fn observe(
        &mut self,
        load: LoadId,
        position: Duration,
        finished: bool,
    ) -> Option<EngineEvent> {
        if self.ended {
            return None;
        }
        if finished {
            self.ended = true;
            return Some(EngineEvent::Ended { load });
        }

        let second = position.as_secs();
        if self.last_second == Some(second) {
            return None;
        }
        self.last_second = Some(second);
        Some(EngineEvent::Progress { load, position })
    }
}
