//! Infrastructure layer for the chaperone process.
//!
//! Contains OS-facing adapters: the low-level mouse hook, the real
//! cursor read/write port, and the console-title status display.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `chaperone_core`, but MUST NOT be imported by the application layer.

pub mod cursor;
pub mod pointer_hook;
