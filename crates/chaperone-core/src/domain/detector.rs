//! Teleport-detection state machine.
//!
//! Absolute-coordinate input devices (touchscreens, graphics tablets)
//! that get interpreted as relative mouse motion show up as sudden,
//! large positional jumps in the pointer stream.  The detector watches
//! every move and click, classifies each jump as either a momentary
//! touch-tap (to be undone once the button is released) or a genuine
//! pointer move (to be kept), and reports the pre-jump position that a
//! restore should return the cursor to.
//!
//! The detector is deliberately a pure state machine: it never reads
//! the real cursor, never sleeps, and never blocks.  It is owned by a
//! single execution context (the event-delivery path) and therefore
//! needs no locking.

use tracing::trace;

/// Manhattan-distance threshold above which a move is considered a
/// teleport rather than ordinary tracking.
pub const JUMP_THRESHOLD: i32 = 100;

/// Number of subsequent move events tolerated before an unconfirmed
/// teleport is abandoned and treated as a genuine move.
pub const IGNORE_BUDGET: u32 = 5;

/// A pointer position in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub x: i32,
    pub y: i32,
}

impl CursorPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to `other`.
    ///
    /// The sum of absolute differences is cheap and sufficient for a
    /// coarse jump threshold; Euclidean precision buys nothing here.
    pub fn manhattan_distance(self, other: CursorPosition) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// A raw pointer event as delivered by the input surface.
///
/// Only the left button participates in the touch heuristic; the hook
/// never translates other buttons or wheel events into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// The cursor moved to an absolute screen position.
    Move(CursorPosition),
    /// The (left) button went down at the given position.
    ButtonDown(CursorPosition),
    /// The (left) button was released.
    ButtonUp,
}

/// How many more moves an in-progress teleport episode may absorb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IgnoreBudget {
    /// Moves left in the grace window; at zero the next move cancels
    /// the episode.
    Remaining(u32),
    /// A button-down confirmed the episode as a touch; the budget never
    /// expires and only a button-up ends the episode.
    Latched,
}

/// Outcome of feeding one pointer event through the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorVerdict {
    /// The event required no state change (e.g. a click with no
    /// teleport in flight).
    Idle,
    /// Ordinary tracking; the stable position followed the move.
    Tracking,
    /// The move was absorbed as noise during the grace window of a
    /// pending teleport.  No distance check was performed.
    Ignored,
    /// The move jumped beyond [`JUMP_THRESHOLD`]; a touch is now
    /// suspected and the pre-jump position is retained for restore.
    TeleportDetected { to: CursorPosition },
    /// A click arrived mid-teleport, committing the touch
    /// interpretation until the matching release.
    TouchConfirmed,
    /// Enough moves arrived without a click; the jump was a genuine
    /// move and `adopted` is the new stable baseline.
    TeleportCancelled { adopted: CursorPosition },
    /// The button was released during a teleport episode: the cursor
    /// should be restored to `target`.
    RestoreTo { target: CursorPosition },
}

/// The teleport-detection state machine.
///
/// Construct once at startup from the real cursor position, then feed
/// every pointer event through [`handle_event`](Self::handle_event).
#[derive(Debug)]
pub struct TeleportDetector {
    /// Last position considered stable, i.e. not part of an in-progress
    /// teleport.  This is the restore target.
    last_stable: CursorPosition,
    /// True while the cursor is believed displaced by a suspected touch.
    teleported: bool,
    ignore_budget: IgnoreBudget,
}

impl TeleportDetector {
    /// Creates a detector with `initial` as the first stable position.
    pub fn new(initial: CursorPosition) -> Self {
        Self {
            last_stable: initial,
            teleported: false,
            ignore_budget: IgnoreBudget::Remaining(IGNORE_BUDGET),
        }
    }

    /// The most recent position not part of an in-progress teleport.
    pub fn last_stable(&self) -> CursorPosition {
        self.last_stable
    }

    /// Whether a teleport episode is currently in flight.
    pub fn is_teleported(&self) -> bool {
        self.teleported
    }

    /// Runs one event through the state machine and returns the verdict.
    ///
    /// Synchronous and allocation-free; safe to call on a latency-bound
    /// event-delivery path.
    pub fn handle_event(&mut self, event: PointerEvent) -> DetectorVerdict {
        match event {
            PointerEvent::ButtonDown(_) => self.on_button_down(),
            PointerEvent::Move(p) => self.on_move(p),
            PointerEvent::ButtonUp => self.on_button_up(),
        }
    }

    fn on_button_down(&mut self) -> DetectorVerdict {
        if !self.teleported {
            return DetectorVerdict::Idle;
        }
        // A click while displaced commits the touch interpretation: the
        // grace window must not expire before the matching release.
        self.ignore_budget = IgnoreBudget::Latched;
        trace!("button down while displaced; latched as touch");
        DetectorVerdict::TouchConfirmed
    }

    fn on_move(&mut self, p: CursorPosition) -> DetectorVerdict {
        if self.teleported {
            match self.ignore_budget {
                IgnoreBudget::Latched => return DetectorVerdict::Ignored,
                IgnoreBudget::Remaining(n) if n > 0 => {
                    // Absorbed as noise; the distance check is skipped
                    // entirely while the grace window is open.
                    self.ignore_budget = IgnoreBudget::Remaining(n - 1);
                    return DetectorVerdict::Ignored;
                }
                IgnoreBudget::Remaining(_) => {
                    // Budget exhausted with no click: this was a genuine
                    // move (e.g. a drawing tablet), not a touch.  The
                    // cancelling move's own position becomes the new
                    // baseline; re-checking the jump distance against it
                    // is zero by construction, so tracking resumes here.
                    self.last_stable = p;
                    self.teleported = false;
                    trace!(x = p.x, y = p.y, "teleport was not a touch");
                    return DetectorVerdict::TeleportCancelled { adopted: p };
                }
            }
        }

        if self.last_stable.manhattan_distance(p) < JUMP_THRESHOLD {
            self.last_stable = p;
            DetectorVerdict::Tracking
        } else {
            // last_stable keeps the pre-jump value so the cursor can be
            // restored to it after a confirmed touch.
            self.teleported = true;
            self.ignore_budget = IgnoreBudget::Remaining(IGNORE_BUDGET);
            trace!(x = p.x, y = p.y, "teleport detected");
            DetectorVerdict::TeleportDetected { to: p }
        }
    }

    fn on_button_up(&mut self) -> DetectorVerdict {
        if !self.teleported {
            return DetectorVerdict::Idle;
        }
        // The episode closes now, whether or not the restore ultimately
        // lands.
        self.teleported = false;
        DetectorVerdict::RestoreTo {
            target: self.last_stable,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
