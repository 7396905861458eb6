//! Pointer capture infrastructure.
//!
//! On Windows, this installs a low-level mouse hook (WH_MOUSE_LL) on a
//! dedicated Win32 message-loop thread.  The hook callback must return
//! within a few hundred milliseconds or Windows removes the hook, so it
//! does nothing beyond translating the message and sending it down an
//! `mpsc` channel; all decision logic runs on the consumer side.
//!
//! Interception is pass-through: every event is forwarded to the next
//! handler in the OS hook chain, and only moves and left-button
//! presses/releases are translated at all.
//!
//! # Testability
//!
//! The `PointerSource` trait allows tests to inject synthetic event
//! sequences without any real OS hook installed.

use std::sync::mpsc;

use chaperone_core::PointerEvent;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// Error type for pointer capture operations.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to install mouse hook: {0}")]
    HookInstallFailed(String),
    #[error("capture source already started – only one may run per process")]
    AlreadyStarted,
    #[error("platform not supported: {0}")]
    UnsupportedPlatform(String),
}

/// Trait abstracting pointer event production.
///
/// The production implementation uses the Windows hook; tests use
/// [`mock::MockPointerSource`].
pub trait PointerSource: Send {
    /// Starts the source and returns a receiver for captured events.
    fn start(&self) -> Result<mpsc::Receiver<PointerEvent>, CaptureError>;

    /// Stops the source and releases any OS resources it can.
    fn stop(&self);
}
