//! Scriptable pointer source for tests.
//!
//! Feeds hand-written [`PointerEvent`] sequences into the capture
//! channel, standing in for the WH_MOUSE_LL hook so the guard pipeline
//! can be driven with no message loop and no OS involvement.

use std::sync::{
    mpsc::{self, Sender},
    Arc, Mutex,
};

use chaperone_core::PointerEvent;

use super::{CaptureError, PointerSource};

/// Test double for [`PointerSource`] driven by [`inject_event`].
///
/// [`inject_event`]: MockPointerSource::inject_event
pub struct MockPointerSource {
    sender: Arc<Mutex<Option<Sender<PointerEvent>>>>,
}

impl MockPointerSource {
    pub fn new() -> Self {
        Self {
            sender: Arc::new(Mutex::new(None)),
        }
    }

    /// Delivers one scripted event to whoever holds the receiver.
    ///
    /// Panics when no delivery channel is live, i.e. before `start()`
    /// or after `stop()`.
    pub fn inject_event(&self, event: PointerEvent) {
        let guard = self.sender.lock().expect("lock poisoned");
        if let Some(ref sender) = *guard {
            sender
                .send(event)
                .expect("event receiver dropped while the script was running");
        } else {
            panic!("inject_event needs a live channel; start() the source first");
        }
    }
}

impl Default for MockPointerSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerSource for MockPointerSource {
    fn start(&self) -> Result<mpsc::Receiver<PointerEvent>, CaptureError> {
        let (tx, rx) = mpsc::channel();
        *self.sender.lock().expect("lock poisoned") = Some(tx);
        Ok(rx)
    }

    fn stop(&self) {
        // Clearing the slot drops the sender and disconnects the
        // receiver, mirroring what the real hook source does.
        *self.sender.lock().expect("lock poisoned") = None;
    }
}
