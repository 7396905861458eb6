//! Cursor Chaperone entry point.
//!
//! Wires the platform services together and runs until Ctrl-C.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ platform_services()    -- hook source, cursor port, status sink
//!  └─ RestoreCoordinator     -- dedicated restore thread (condvar mailbox)
//!  └─ PointerSource::start() -- WH_MOUSE_LL hook + Win32 message loop
//!  └─ event pump             -- blocking task feeding CursorGuard
//! ```

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chaperone::application::guard_cursor::{CursorGuard, CursorPort, GuardStatus, StatusSink};
use chaperone::application::restore::{RestoreCoordinator, RestoreSlot};
use chaperone::infrastructure::pointer_hook::PointerSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Cursor Chaperone starting");

    let (source, cursor, status) = platform_services()?;
    status.set_status(GuardStatus::Watching);

    // Seed the detector with the real cursor position so the first
    // stable baseline is wherever the pointer currently rests.
    let initial = cursor.position();
    info!(x = initial.x, y = initial.y, "initial cursor position");

    let slot = Arc::new(RestoreSlot::new());
    let _restore_thread =
        RestoreCoordinator::new(Arc::clone(&slot), Arc::clone(&cursor), Arc::clone(&status))
            .spawn()
            .context("failed to spawn restore thread")?;

    // Hook installation failure is fatal: the process cannot fulfil its
    // purpose without system-wide event delivery.
    let events = source
        .start()
        .context("failed to install the mouse hook")?;

    // Event pump: blocking recv loop on a dedicated worker.  The guard
    // (and the detector it owns) lives entirely on this context.
    let mut guard = CursorGuard::new(initial, slot, status);
    let _pump = tokio::task::spawn_blocking(move || {
        while let Ok(event) = events.recv() {
            guard.handle_event(event);
        }
    });

    info!("watching for touch jumps; press Ctrl-C to exit");

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    source.stop();

    info!("Cursor Chaperone stopped");
    Ok(())
}

#[cfg(target_os = "windows")]
fn platform_services() -> anyhow::Result<(
    Box<dyn PointerSource>,
    Arc<dyn CursorPort>,
    Arc<dyn StatusSink>,
)> {
    use chaperone::infrastructure::cursor::windows::{ConsoleTitleSink, WindowsCursor};
    use chaperone::infrastructure::pointer_hook::windows::WindowsPointerSource;

    Ok((
        Box::new(WindowsPointerSource::new()),
        Arc::new(WindowsCursor::new()),
        Arc::new(ConsoleTitleSink::new()),
    ))
}

#[cfg(not(target_os = "windows"))]
fn platform_services() -> anyhow::Result<(
    Box<dyn PointerSource>,
    Arc<dyn CursorPort>,
    Arc<dyn StatusSink>,
)> {
    anyhow::bail!("no system-wide pointer hook backend for this platform (Windows only)")
}
