//! Windows cursor control and console-title status display.

#![cfg(target_os = "windows")]

use tracing::warn;
use windows::core::HSTRING;
use windows::Win32::Foundation::POINT;
use windows::Win32::System::Console::SetConsoleTitleW;
use windows::Win32::UI::WindowsAndMessaging::{GetCursorPos, SetCursorPos};

use chaperone_core::CursorPosition;

use crate::application::guard_cursor::{CursorPort, GuardStatus, StatusSink};

/// Windows implementation of [`CursorPort`] using GetCursorPos and
/// SetCursorPos.
pub struct WindowsCursor;

impl WindowsCursor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorPort for WindowsCursor {
    fn position(&self) -> CursorPosition {
        let mut pt = POINT::default();
        // SAFETY: pt is a valid out-pointer for the duration of the call.
        if let Err(e) = unsafe { GetCursorPos(&mut pt) } {
            warn!("GetCursorPos failed: {e}");
        }
        CursorPosition::new(pt.x, pt.y)
    }

    fn set_position(&self, pos: CursorPosition) {
        // SAFETY: plain FFI call with scalar arguments.
        if let Err(e) = unsafe { SetCursorPos(pos.x, pos.y) } {
            warn!("SetCursorPos({}, {}) failed: {e}", pos.x, pos.y);
        }
    }
}

/// Console-title status display.
///
/// Mirrors the guard state in the terminal title bar so the operator
/// can see at a glance whether a touch episode is in flight.
pub struct ConsoleTitleSink;

impl ConsoleTitleSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleTitleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSink for ConsoleTitleSink {
    fn set_status(&self, status: GuardStatus) {
        let title = match status {
            GuardStatus::Watching => "Cursor Chaperone",
            GuardStatus::Displaced => "Cursor Chaperone …",
            GuardStatus::TouchConfirmed => "Cursor Chaperone ☟",
        };
        // Best-effort operator feedback; failures are ignored.
        // SAFETY: HSTRING provides a valid null-terminated wide string.
        let _ = unsafe { SetConsoleTitleW(&HSTRING::from(title)) };
    }
}
