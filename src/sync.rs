//! Sync scheduler: maps wall-clock time since the shared anchor onto the
//! playlist and starts playback there.

mod clock;
mod scheduler;

pub use clock::{Clock, SystemClock, anchor_instant};
pub use scheduler::{SyncOutcome, SyncScheduler, SyncState};
