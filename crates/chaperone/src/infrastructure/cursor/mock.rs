//! Recording cursor and status doubles for tests.
//!
//! Used by both `#[cfg(test)]` modules and the integration suite to
//! observe what the guard and the restore thread would have done to the
//! real cursor and status display.

use std::sync::Mutex;
use std::time::Instant;

use chaperone_core::CursorPosition;

use crate::application::guard_cursor::{CursorPort, GuardStatus, StatusSink};

/// A [`CursorPort`] double that records every position write with a
/// timestamp, for asserting on restore targets and settle timing.
pub struct RecordingCursor {
    position: Mutex<CursorPosition>,
    sets: Mutex<Vec<(CursorPosition, Instant)>>,
}

impl RecordingCursor {
    pub fn new(initial: CursorPosition) -> Self {
        Self {
            position: Mutex::new(initial),
            sets: Mutex::new(Vec::new()),
        }
    }

    /// All `set_position` calls so far, in order, with call instants.
    pub fn set_calls(&self) -> Vec<(CursorPosition, Instant)> {
        self.sets.lock().expect("lock poisoned").clone()
    }
}

impl CursorPort for RecordingCursor {
    fn position(&self) -> CursorPosition {
        *self.position.lock().expect("lock poisoned")
    }

    fn set_position(&self, pos: CursorPosition) {
        *self.position.lock().expect("lock poisoned") = pos;
        self.sets
            .lock()
            .expect("lock poisoned")
            .push((pos, Instant::now()));
    }
}

/// A [`StatusSink`] double that records the status sequence.
#[derive(Default)]
pub struct RecordingStatusSink {
    statuses: Mutex<Vec<GuardStatus>>,
}

impl RecordingStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All statuses reported so far, in order.
    pub fn statuses(&self) -> Vec<GuardStatus> {
        self.statuses.lock().expect("lock poisoned").clone()
    }
}

impl StatusSink for RecordingStatusSink {
    fn set_status(&self, status: GuardStatus) {
        self.statuses.lock().expect("lock poisoned").push(status);
    }
}
