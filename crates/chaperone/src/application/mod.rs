//! Application layer for the chaperone process.
//!
//! Use cases here orchestrate the domain detector and depend only on
//! traits, so the infrastructure (OS hook, real cursor, console title)
//! can be swapped for test doubles without changing this code.
//!
//! # Sub-modules
//!
//! - **`guard_cursor`** – Feeds captured pointer events through the
//!   teleport detector and turns verdicts into status updates and
//!   restore requests.  Runs on every mouse move, so it must never
//!   block.
//!
//! - **`restore`** – The single-slot restore mailbox and the dedicated
//!   thread that applies a requested cursor restore after the settle
//!   delay.

pub mod guard_cursor;
pub mod restore;
