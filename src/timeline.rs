//! Maps time elapsed since the anchor onto the playlist.
//!
//! The timeline is the concatenation of every track's duration in playlist
//! order. [`locate`] finds the track and offset for an elapsed time without
//! wrapping: anything at or past the end of the timeline maps back to the
//! start of track 0. [`locate_wrapped`] loops the timeline instead.
//!
//! Zero-length tracks (unresolved durations) can never contain a position,
//! so they are never selected; a boundary that falls on one moves on to the
//! next track with a non-zero duration.

use std::time::Duration;

/// A point on the timeline: which track, and how far into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub index: usize,
    pub offset: Duration,
}

impl Position {
    pub const START: Position = Position {
        index: 0,
        offset: Duration::ZERO,
    };
}

/// Sum of all durations, i.e. the length of one pass over the timeline.
pub fn total(durations: &[Duration]) -> Duration {
    durations.iter().sum()
}

/// Find the first track whose inclusive cumulative duration strictly exceeds
/// `elapsed`, and the offset into it.
///
/// Returns [`Position::START`] when `elapsed` is at or past the total, or
/// when the total is zero.
pub fn locate(durations: &[Duration], elapsed: Duration) -> Position {
    let mut cumulative = Duration::ZERO;
    for (index, &duration) in durations.iter().enumerate() {
        if cumulative + duration > elapsed {
            return Position {
                index,
                offset: elapsed - cumulative,
            };
        }
        cumulative += duration;
    }
    Position::START
}

/// Like [`locate`], but reduces `elapsed` modulo the total first so the
/// timeline repeats from track 0 indefinitely.
pub fn locate_wrapped(durations: &[Duration], elapsed: Duration) -> Position {
    let total = total(durations).as_nanos();
    if total == 0 {
        return Position::START;
    }
    let within = elapsed.as_nanos() % total;
    // `within < total`, and the total of a real playlist fits comfortably in u64 nanos.
    let within = Duration::from_nanos(u64::try_from(within).unwrap_or(u64::MAX));
    locate(durations, within)
}
