//! Windows low-level mouse hook implementation.
//!
//! Installs a WH_MOUSE_LL hook using the Windows API.  The hook runs on
//! a dedicated Win32 message-loop thread; the callback only translates
//! the message into a [`PointerEvent`] and sends it over a channel.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI
//! calls.  All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::sync::mpsc::{self, Sender};
use std::sync::Mutex;
use std::thread;

use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, SetWindowsHookExW, UnhookWindowsHookEx,
    HC_ACTION, MSG, MSLLHOOKSTRUCT, WH_MOUSE_LL, WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MOUSEMOVE,
};

use chaperone_core::{CursorPosition, PointerEvent};

use super::{CaptureError, PointerSource};

/// Sender used by the hook callback to deliver events.  Installed by
/// [`WindowsPointerSource::start`]; `stop()` clears it, which
/// disconnects the consumer's receiver and lets the event pump wind
/// down.
static EVENT_SENDER: Mutex<Option<Sender<PointerEvent>>> = Mutex::new(None);

/// Windows low-level pointer capture source.
pub struct WindowsPointerSource;

impl WindowsPointerSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsPointerSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerSource for WindowsPointerSource {
    fn start(&self) -> Result<mpsc::Receiver<PointerEvent>, CaptureError> {
        let (tx, rx) = mpsc::channel::<PointerEvent>();

        // Register the global sender.  Fails if another source is live.
        {
            let mut sender = EVENT_SENDER.lock().expect("sender lock poisoned");
            if sender.is_some() {
                return Err(CaptureError::AlreadyStarted);
            }
            *sender = Some(tx);
        }

        // The hook must be installed from the thread that runs its
        // message loop.  Wait for the install result so a failure is a
        // fatal startup error rather than a silent dead hook.
        let (install_tx, install_rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("chaperone-hook-loop".to_string())
            .spawn(move || run_hook_message_loop(install_tx));
        if let Err(e) = spawned {
            self.stop();
            return Err(CaptureError::HookInstallFailed(e.to_string()));
        }

        match install_rx.recv() {
            Ok(Ok(())) => Ok(rx),
            Ok(Err(e)) => {
                self.stop();
                Err(CaptureError::HookInstallFailed(e))
            }
            Err(_) => {
                self.stop();
                Err(CaptureError::HookInstallFailed(
                    "hook thread exited before reporting".to_string(),
                ))
            }
        }
    }

    fn stop(&self) {
        // Dropping the sender disconnects the receiver, so the event
        // pump's recv loop ends and the process can exit.  The hook
        // thread itself keeps pumping messages and dies with the
        // process; Windows removes the hook at that point.
        *EVENT_SENDER.lock().expect("sender lock poisoned") = None;
    }
}

/// Entry point for the dedicated Win32 message-loop thread.
fn run_hook_message_loop(install_tx: Sender<Result<(), String>>) {
    // SAFETY: SetWindowsHookExW requires the calling thread to run a
    // message loop, which this thread does below.
    let hook = match unsafe { SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_hook_proc), None, 0) } {
        Ok(h) => h,
        Err(e) => {
            let _ = install_tx.send(Err(e.to_string()));
            return;
        }
    };
    let _ = install_tx.send(Ok(()));

    // Win32 message loop – blocks until WM_QUIT is posted.
    let mut msg = MSG::default();
    // SAFETY: Standard Win32 GetMessage/DispatchMessage loop pattern.
    unsafe {
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            DispatchMessageW(&msg);
        }
        UnhookWindowsHookEx(hook).ok();
    }
}

/// Low-level mouse hook callback.
///
/// # Safety
///
/// Called by Windows from the hook message-loop thread.  It must return
/// quickly (< ~300ms) to avoid hook removal by the OS, so the only work
/// done here is a channel send.
unsafe extern "system" fn mouse_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code != HC_ACTION as i32 {
        // SAFETY: Must call CallNextHookEx when n_code < 0.
        return CallNextHookEx(None, n_code, w_param, l_param);
    }

    // SAFETY: l_param points to an MSLLHOOKSTRUCT when n_code == HC_ACTION.
    let mhs = &*(l_param.0 as *const MSLLHOOKSTRUCT);
    let position = CursorPosition::new(mhs.pt.x, mhs.pt.y);

    let event = match w_param.0 as u32 {
        WM_MOUSEMOVE => PointerEvent::Move(position),
        // Only the left button participates in the touch heuristic;
        // everything else passes through untranslated.
        WM_LBUTTONDOWN => PointerEvent::ButtonDown(position),
        WM_LBUTTONUP => PointerEvent::ButtonUp,
        _ => {
            return CallNextHookEx(None, n_code, w_param, l_param);
        }
    };

    // Brief lock hold; stop() clearing the slot is the only contention.
    if let Ok(sender) = EVENT_SENDER.lock() {
        if let Some(sender) = sender.as_ref() {
            // Ignore send errors (channel closed during shutdown).
            let _ = sender.send(event);
        }
    }

    // SAFETY: Pass-through interception – always forward to the next
    // hook in the chain.
    CallNextHookEx(None, n_code, w_param, l_param)
}
