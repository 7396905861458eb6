//! Deferred cursor restoration.
//!
//! The detector runs on the event-delivery context and must never
//! sleep, so the actual restore is handed off through a single-slot
//! mailbox to a dedicated thread.  The thread waits out a fixed settle
//! delay before moving the cursor back: the desktop shell needs a
//! moment to finish processing the click at the touched position, and
//! moving the pointer under it too early makes it misread the click
//! location.
//!
//! The mailbox is overwrite-wins: at most one restore target is pending
//! at a time, and a new submission replaces an unconsumed one.  There
//! is no queue and no cancellation of an in-flight delay; the thread
//! re-reads the slot after sleeping and applies whatever target is
//! present at that moment.

use std::io;
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::Duration;

use chaperone_core::CursorPosition;
use tracing::info;

use crate::application::guard_cursor::{CursorPort, GuardStatus, StatusSink};

/// Fixed pause between a restore request and the cursor write.
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Single-slot restore mailbox shared between the event-delivery
/// context (fill) and the restore thread (drain).
#[derive(Debug, Default)]
pub struct RestoreSlot {
    pending: Mutex<Option<CursorPosition>>,
    ready: Condvar,
}

impl RestoreSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submits a restore target, overwriting any unconsumed one.
    ///
    /// Non-blocking beyond the brief lock hold; safe to call from the
    /// event-delivery context.
    pub fn submit(&self, target: CursorPosition) {
        let mut slot = self.pending.lock().expect("mailbox lock poisoned");
        *slot = Some(target);
        drop(slot);
        self.ready.notify_one();
    }

    /// Blocks until the slot holds a target, without consuming it.
    fn wait_pending(&self) {
        let mut slot = self.pending.lock().expect("mailbox lock poisoned");
        while slot.is_none() {
            slot = self.ready.wait(slot).expect("mailbox lock poisoned");
        }
    }

    /// Drains the currently pending target, if any.
    pub(crate) fn take(&self) -> Option<CursorPosition> {
        self.pending.lock().expect("mailbox lock poisoned").take()
    }
}

/// Owns the dedicated restore thread.
///
/// The thread loops forever: wait for a pending target, sleep the
/// settle delay outside the lock, apply whatever target is pending by
/// then, and go back to waiting.
pub struct RestoreCoordinator {
    slot: Arc<RestoreSlot>,
    cursor: Arc<dyn CursorPort>,
    status: Arc<dyn StatusSink>,
}

impl RestoreCoordinator {
    pub fn new(
        slot: Arc<RestoreSlot>,
        cursor: Arc<dyn CursorPort>,
        status: Arc<dyn StatusSink>,
    ) -> Self {
        Self {
            slot,
            cursor,
            status,
        }
    }

    /// Spawns the restore thread.  It runs for the process lifetime.
    pub fn spawn(self) -> io::Result<thread::JoinHandle<()>> {
        thread::Builder::new()
            .name("chaperone-restore".to_string())
            .spawn(move || self.run())
    }

    fn run(self) {
        loop {
            self.slot.wait_pending();

            // Sleep outside the lock: a submission arriving during the
            // delay must be able to overwrite the pending target.
            thread::sleep(SETTLE_DELAY);

            // Re-check after the delay and apply whatever is pending
            // now, which may be newer than the value that woke us.
            if let Some(target) = self.slot.take() {
                self.cursor.set_position(target);
                self.status.set_status(GuardStatus::Watching);
                info!(x = target.x, y = target.y, "cursor restored");
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
