//! Frame-clocked replay of search snapshots.
//!
//! The solver hands back a finished sequence of [`SearchStep`]s; this module walks through it at a
//! fixed pace so the in-game screen can show the search unfolding. Solvers without a trace get a
//! synthetic one revealing their path a cell at a time.

use std::{
    collections::BTreeSet,
    time::{Duration, Instant},
};

use crate::{grid::Coord, solver::SearchStep};

/// Animation frame delay in milliseconds.
///
/// This constant controls the timing between replayed snapshots. A lower value speeds the replay
/// up, while a higher value makes the search easier to follow.
pub(crate) const ANIMATION_FRAME_DELAY_MS: u64 = 60;

/// Replay state for a sequence of search snapshots.
///
/// The replay stops on the last snapshot instead of looping, so the finished path stays on
/// screen.
#[derive(Debug)]
pub(crate) struct Playback {
    /// Snapshots to replay.
    ///
    /// This field stores the whole search as returned by the solver, or the synthetic path reveal
    /// for solvers without a trace.
    steps: Vec<SearchStep>,
    /// Index of the snapshot currently on screen.
    current_index: usize,
    /// Timestamp of the last frame change.
    ///
    /// This field stores the time when the replay last advanced, used to keep a steady pace
    /// between frames.
    last_update_time: Instant,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

impl Playback {
    /// Creates an empty playback.
    pub(crate) fn new() -> Self {
        Self {
            steps: Vec::new(),
            current_index: 0,
            last_update_time: Instant::now(),
        }
    }

    /// Replaces the replayed snapshots and rewinds to the first one.
    pub(crate) fn load(&mut self, steps: Vec<SearchStep>) {
        self.steps = steps;
        self.current_index = 0;
        self.last_update_time = Instant::now();
    }

    /// Drops every snapshot.
    pub(crate) fn clear(&mut self) {
        self.load(Vec::new());
    }

    /// Returns whether there is nothing to replay.
    pub(crate) fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns whether the last snapshot is on screen.
    pub(crate) fn is_finished(&self) -> bool {
        self.current_index + 1 >= self.steps.len()
    }

    /// Returns the snapshot on screen.
    pub(crate) fn current(&self) -> Option<&SearchStep> {
        self.steps.get(self.current_index)
    }

    /// Returns the one-based position of the snapshot on screen and the number of snapshots.
    pub(crate) fn progress(&self) -> (usize, usize) {
        if self.steps.is_empty() {
            (0, 0)
        } else {
            (self.current_index + 1, self.steps.len())
        }
    }

    /// Moves to the next snapshot, staying on the last one.
    pub(crate) fn advance(&mut self) {
        if !self.is_finished() {
            self.current_index += 1;
        }
    }

    /// Advances the replay once a frame delay has elapsed since the last change.
    pub(crate) fn update(&mut self) {
        self.update_at(Instant::now());
    }

    /// Advances the replay if a frame delay separates `now` from the last change.
    fn update_at(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_update_time);
        if elapsed >= Duration::from_millis(ANIMATION_FRAME_DELAY_MS) {
            self.last_update_time = now;
            self.advance();
        }
    }
}

/// Builds snapshots revealing `path` one cell at a time.
///
/// Cells already walked are reported as closed, the newest cell as current, and a last snapshot
/// carries the whole path. An empty path yields no snapshots.
pub(crate) fn path_reveal(path: &[Coord]) -> Vec<SearchStep> {
    let mut steps = Vec::with_capacity(path.len() + 1);
    let mut walked = BTreeSet::new();

    for &cell in path {
        steps.push(SearchStep {
            open: BTreeSet::new(),
            closed: walked.clone(),
            current: cell,
            path: Vec::new(),
        });
        let _ = walked.insert(cell);
    }

    if let Some(&last) = path.last() {
        let _ = walked.remove(&last);
        steps.push(SearchStep {
            open: BTreeSet::new(),
            closed: walked,
            current: last,
            path: path.to_vec(),
        });
    }

    steps
}
