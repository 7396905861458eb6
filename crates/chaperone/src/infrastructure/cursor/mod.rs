//! Cursor and status-display adapters.
//!
//! Implements the application-layer [`CursorPort`] and [`StatusSink`]
//! traits: on Windows against GetCursorPos/SetCursorPos and the console
//! title, and as recording doubles for tests.
//!
//! [`CursorPort`]: crate::application::guard_cursor::CursorPort
//! [`StatusSink`]: crate::application::guard_cursor::StatusSink

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;
