//! # chaperone-core
//!
//! Domain library for Cursor Chaperone: the teleport-detection state
//! machine that decides whether a large pointer jump was a momentary
//! touch interaction (undo it on release) or a genuine move (keep it).
//!
//! This crate has zero dependencies on OS APIs, threads, or I/O.  The
//! detector is a pure state-transition function over a serialized
//! stream of pointer events, which is what makes it unit-testable and
//! benchmarkable without a real input hook installed.
//!
//! The resident application (`chaperone`) feeds it events captured from
//! the system-wide mouse hook and acts on the verdicts it returns.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `chaperone_core::TeleportDetector` instead of the full path.
pub use domain::detector::{
    CursorPosition, DetectorVerdict, PointerEvent, TeleportDetector, IGNORE_BUDGET,
    JUMP_THRESHOLD,
};
