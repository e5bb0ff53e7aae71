//! In-memory collaborators shared by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, SystemTime};

use crate::audio::{AudioEngine, AudioError, EngineEvent, LoadId};
use crate::display::{Display, NowPlaying};
use crate::library::{Playlist, Track};
use crate::sync::Clock;

pub fn track(path: &str, secs: u64) -> Track {
    Track {
        path: PathBuf::from(path),
        name: Path::new(path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(path)
            .to_string(),
        duration: Duration::from_secs(secs),
    }
}

pub fn playlist(entries: &[(&str, u64)]) -> Playlist {
    Playlist::new(entries.iter().map(|&(p, s)| track(p, s)).collect())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Load(PathBuf, Duration),
    Play,
    Stop,
    FadeOut(Duration),
}

#[derive(Debug, Default)]
struct EngineInner {
    calls: Vec<EngineCall>,
    failing: HashSet<PathBuf>,
    pending: VecDeque<EngineEvent>,
    load: u64,
    position: Duration,
}

/// Scriptable engine. Clones share state so a test can keep a handle after
/// moving one into the controller.
#[derive(Debug, Clone, Default)]
pub struct FakeEngine {
    inner: Rc<RefCell<EngineInner>>,
}

impl FakeEngine {
    pub fn failing(paths: &[&str]) -> Self {
        let engine = Self::default();
        engine
            .inner
            .borrow_mut()
            .failing
            .extend(paths.iter().map(PathBuf::from));
        engine
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.inner.borrow().calls.clone()
    }

    /// `(path, start)` of every load attempt, failed ones included.
    pub fn loads(&self) -> Vec<(PathBuf, Duration)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                EngineCall::Load(p, d) => Some((p, d)),
                _ => None,
            })
            .collect()
    }

    pub fn current_load(&self) -> LoadId {
        LoadId(self.inner.borrow().load)
    }

    pub fn push(&self, event: EngineEvent) {
        self.inner.borrow_mut().pending.push_back(event);
    }
}

impl AudioEngine for FakeEngine {
    fn load(&mut self, path: &Path, start_at: Duration) -> Result<LoadId, AudioError> {
        let mut inner = self.inner.borrow_mut();
        inner
            .calls
            .push(EngineCall::Load(path.to_path_buf(), start_at));
        if inner.failing.contains(path) {
            return Err(AudioError::Open {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        inner.load += 1;
        inner.position = start_at;
        Ok(LoadId(inner.load))
    }

    fn play(&mut self) {
        self.inner.borrow_mut().calls.push(EngineCall::Play);
    }

    fn stop(&mut self) {
        self.inner.borrow_mut().calls.push(EngineCall::Stop);
    }

    fn position(&self) -> Duration {
        self.inner.borrow().position
    }

    fn poll_event(&mut self) -> Option<EngineEvent> {
        self.inner.borrow_mut().pending.pop_front()
    }

    fn fade_out(&mut self, over: Duration) {
        self.inner.borrow_mut().calls.push(EngineCall::FadeOut(over));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    NowPlaying(NowPlaying),
    Waiting(SystemTime),
    NoContent,
}

/// Display that keeps every update it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    log: Rc<RefCell<Vec<Shown>>>,
}

impl RecordingDisplay {
    pub fn history(&self) -> Vec<Shown> {
        self.log.borrow().clone()
    }

    pub fn last(&self) -> Option<Shown> {
        self.log.borrow().last().cloned()
    }
}

impl Display for RecordingDisplay {
    fn now_playing(&mut self, now: NowPlaying) {
        self.log.borrow_mut().push(Shown::NowPlaying(now));
    }

    fn waiting(&mut self, anchor: SystemTime) {
        self.log.borrow_mut().push(Shown::Waiting(anchor));
    }

    fn no_content(&mut self) {
        self.log.borrow_mut().push(Shown::NoContent);
    }
}

/// Wall clock under test control.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<SystemTime>>,
}

impl ManualClock {
    pub fn at_unix(secs: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        self.now.get()
    }
}
