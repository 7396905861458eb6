//! GuardCursor use case: reacts to detector verdicts.
//!
//! This use case runs on the event-delivery context.  It feeds every
//! captured [`PointerEvent`] through the [`TeleportDetector`], logs and
//! reports the interesting transitions, and on a restore verdict hands
//! the target position to the restore mailbox without blocking.  The
//! actual cursor write happens later, on the restore thread.

use std::sync::Arc;

use chaperone_core::{CursorPosition, DetectorVerdict, PointerEvent, TeleportDetector};
use tracing::{debug, info};

use crate::application::restore::RestoreSlot;

/// Trait for reading and writing the real cursor position.
///
/// The infrastructure implementation calls GetCursorPos/SetCursorPos;
/// test implementations record calls.
pub trait CursorPort: Send + Sync {
    /// Current cursor position in screen coordinates.
    fn position(&self) -> CursorPosition;

    /// Moves the cursor to `pos`.  Best-effort: OS-level failures are
    /// the implementation's concern and are not surfaced here.
    fn set_position(&self, pos: CursorPosition);
}

/// Operator-visible state of the guard, shown on the status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardStatus {
    /// Nothing suspicious in flight.
    Watching,
    /// A teleport was detected and awaits confirmation or expiry.
    Displaced,
    /// A click confirmed the displacement as a touch; the cursor will
    /// be restored on release.
    TouchConfirmed,
}

/// Best-effort textual status sink (e.g. the console title).
///
/// Purely observational; implementations swallow failures.
pub trait StatusSink: Send + Sync {
    fn set_status(&self, status: GuardStatus);
}

/// The guard use case: detector plus its reactions.
pub struct CursorGuard {
    detector: TeleportDetector,
    restore: Arc<RestoreSlot>,
    status: Arc<dyn StatusSink>,
}

impl CursorGuard {
    /// Creates a guard with `initial` as the first stable cursor
    /// position (read from the real cursor at startup).
    pub fn new(
        initial: CursorPosition,
        restore: Arc<RestoreSlot>,
        status: Arc<dyn StatusSink>,
    ) -> Self {
        Self {
            detector: TeleportDetector::new(initial),
            restore,
            status,
        }
    }

    /// Handles one captured pointer event.
    ///
    /// Never blocks and never sleeps; the hook delivery path has a hard
    /// latency obligation.
    pub fn handle_event(&mut self, event: PointerEvent) {
        match self.detector.handle_event(event) {
            DetectorVerdict::Idle | DetectorVerdict::Tracking | DetectorVerdict::Ignored => {}
            DetectorVerdict::TeleportDetected { to } => {
                debug!(x = to.x, y = to.y, "teleported");
                self.status.set_status(GuardStatus::Displaced);
            }
            DetectorVerdict::TouchConfirmed => {
                debug!("teleport confirmed as touch; restore armed for release");
                self.status.set_status(GuardStatus::TouchConfirmed);
            }
            DetectorVerdict::TeleportCancelled { adopted } => {
                info!(x = adopted.x, y = adopted.y, "teleport was not a touch");
                self.status.set_status(GuardStatus::Watching);
            }
            DetectorVerdict::RestoreTo { target } => {
                info!(x = target.x, y = target.y, "touch released; scheduling restore");
                self.restore.submit(target);
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // ── Test doubles ──────────────────────────────────────────────────────────

    #[derive(Default)]
    struct RecordingSink {
        statuses: Mutex<Vec<GuardStatus>>,
    }

    impl RecordingSink {
        fn statuses(&self) -> Vec<GuardStatus> {
            self.statuses.lock().expect("lock poisoned").clone()
        }
    }

    impl StatusSink for RecordingSink {
        fn set_status(&self, status: GuardStatus) {
            self.statuses.lock().expect("lock poisoned").push(status);
        }
    }

    fn pos(x: i32, y: i32) -> CursorPosition {
        CursorPosition::new(x, y)
    }

    fn make_guard(initial: CursorPosition) -> (CursorGuard, Arc<RestoreSlot>, Arc<RecordingSink>) {
        let slot = Arc::new(RestoreSlot::new());
        let sink = Arc::new(RecordingSink::default());
        let guard = CursorGuard::new(
            initial,
            Arc::clone(&slot),
            Arc::clone(&sink) as Arc<dyn StatusSink>,
        );
        (guard, slot, sink)
    }

    // ── Ordinary activity ─────────────────────────────────────────────────────

    #[test]
    fn test_tracking_and_plain_clicks_produce_no_output() {
        // Arrange
        let (mut guard, slot, sink) = make_guard(pos(0, 0));

        // Act – small moves and a plain click
        guard.handle_event(PointerEvent::Move(pos(20, 20)));
        guard.handle_event(PointerEvent::ButtonDown(pos(20, 20)));
        guard.handle_event(PointerEvent::ButtonUp);
        guard.handle_event(PointerEvent::Move(pos(50, 40)));

        // Assert
        assert!(sink.statuses().is_empty(), "no status noise for normal use");
        assert_eq!(slot.take(), None, "no restore request for normal use");
    }

    // ── Touch tap ─────────────────────────────────────────────────────────────

    #[test]
    fn test_touch_tap_submits_restore_to_pre_jump_position() {
        // Arrange
        let (mut guard, slot, _sink) = make_guard(pos(0, 0));
        guard.handle_event(PointerEvent::Move(pos(30, 30)));

        // Act
        guard.handle_event(PointerEvent::Move(pos(900, 700)));
        guard.handle_event(PointerEvent::ButtonDown(pos(900, 700)));
        guard.handle_event(PointerEvent::ButtonUp);

        // Assert
        assert_eq!(slot.take(), Some(pos(30, 30)));
    }

    #[test]
    fn test_touch_tap_status_sequence() {
        // Arrange
        let (mut guard, _slot, sink) = make_guard(pos(0, 0));

        // Act
        guard.handle_event(PointerEvent::Move(pos(900, 700)));
        guard.handle_event(PointerEvent::ButtonDown(pos(900, 700)));
        guard.handle_event(PointerEvent::ButtonUp);

        // Assert – detection and confirmation are both reported; the
        // return to Watching is reported by the restore thread, not here
        assert_eq!(
            sink.statuses(),
            vec![GuardStatus::Displaced, GuardStatus::TouchConfirmed]
        );
    }

    // ── Cancellation ──────────────────────────────────────────────────────────

    #[test]
    fn test_cancelled_teleport_reports_watching_and_no_restore() {
        // Arrange
        let (mut guard, slot, sink) = make_guard(pos(0, 0));
        guard.handle_event(PointerEvent::Move(pos(900, 700)));

        // Act – six moves with no click: five absorbed, sixth cancels
        for i in 0..6 {
            guard.handle_event(PointerEvent::Move(pos(910 + i, 700)));
        }
        guard.handle_event(PointerEvent::ButtonUp);

        // Assert
        assert_eq!(
            sink.statuses(),
            vec![GuardStatus::Displaced, GuardStatus::Watching]
        );
        assert_eq!(slot.take(), None);
    }
}
