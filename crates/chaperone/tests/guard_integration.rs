//! Integration tests for the full guard pipeline.
//!
//! These tests exercise `MockPointerSource` → `CursorGuard` →
//! `RestoreSlot` → `RestoreCoordinator` → `RecordingCursor` end-to-end,
//! with no OS hook installed.  Timing assertions use generous margins
//! around the fixed 100 ms settle delay.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chaperone::application::guard_cursor::{CursorGuard, CursorPort, GuardStatus, StatusSink};
use chaperone::application::restore::{RestoreCoordinator, RestoreSlot, SETTLE_DELAY};
use chaperone::infrastructure::cursor::mock::{RecordingCursor, RecordingStatusSink};
use chaperone::infrastructure::pointer_hook::{mock::MockPointerSource, PointerSource};
use chaperone_core::{CursorPosition, PointerEvent};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn pos(x: i32, y: i32) -> CursorPosition {
    CursorPosition::new(x, y)
}

/// Polls until the cursor double has seen at least `n` writes or the
/// timeout elapses.
fn wait_for_set_calls(cursor: &RecordingCursor, n: usize, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cursor.set_calls().len() >= n {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    cursor.set_calls().len() >= n
}

struct Pipeline {
    source: MockPointerSource,
    cursor: Arc<RecordingCursor>,
    status: Arc<RecordingStatusSink>,
    pump: thread::JoinHandle<()>,
}

/// Builds the whole pipeline around a mock source, with the guard
/// seeded at `initial` and its pump running on a dedicated thread.
fn start_pipeline(initial: CursorPosition) -> Pipeline {
    let cursor = Arc::new(RecordingCursor::new(initial));
    let status = Arc::new(RecordingStatusSink::new());
    let slot = Arc::new(RestoreSlot::new());

    let _restore = RestoreCoordinator::new(
        Arc::clone(&slot),
        Arc::clone(&cursor) as Arc<dyn CursorPort>,
        Arc::clone(&status) as Arc<dyn StatusSink>,
    )
    .spawn()
    .expect("restore thread must spawn");

    let source = MockPointerSource::new();
    let rx = source.start().expect("mock source must start");
    let mut guard = CursorGuard::new(initial, slot, Arc::clone(&status) as Arc<dyn StatusSink>);
    let pump = thread::spawn(move || {
        while let Ok(event) = rx.recv() {
            guard.handle_event(event);
        }
    });

    Pipeline {
        source,
        cursor,
        status,
        pump,
    }
}

// ── Touch tap end-to-end ──────────────────────────────────────────────────────

#[test]
fn test_touch_tap_restores_cursor_once_after_settle_delay() {
    // Arrange
    let p = start_pipeline(pos(10, 10));
    let injected_at = Instant::now();

    // Act – jump, press, release; then drain the pump
    p.source.inject_event(PointerEvent::Move(pos(800, 600)));
    p.source.inject_event(PointerEvent::ButtonDown(pos(800, 600)));
    p.source.inject_event(PointerEvent::ButtonUp);
    p.source.stop();
    p.pump.join().expect("pump must drain and exit");

    // Assert – exactly one restore, to the pre-jump position, and not
    // before the settle delay has elapsed
    assert!(wait_for_set_calls(&p.cursor, 1, Duration::from_secs(2)));
    thread::sleep(SETTLE_DELAY * 2); // allow any spurious extra write to land
    let calls = p.cursor.set_calls();
    assert_eq!(calls.len(), 1, "restore must be applied exactly once");
    assert_eq!(calls[0].0, pos(10, 10));
    assert!(
        calls[0].1.duration_since(injected_at) >= SETTLE_DELAY,
        "restore must wait out the settle delay"
    );
}

#[test]
fn test_touch_tap_status_sequence_ends_watching() {
    // Arrange
    let p = start_pipeline(pos(0, 0));

    // Act
    p.source.inject_event(PointerEvent::Move(pos(500, 500)));
    p.source.inject_event(PointerEvent::ButtonDown(pos(500, 500)));
    p.source.inject_event(PointerEvent::ButtonUp);
    p.source.stop();
    p.pump.join().expect("pump must drain and exit");
    assert!(wait_for_set_calls(&p.cursor, 1, Duration::from_secs(2)));
    // The coordinator reports Watching right after the cursor write;
    // give that last push a moment to land.
    thread::sleep(Duration::from_millis(50));

    // Assert – detection, confirmation, then back to watching after the
    // restore completes on the coordinator thread
    assert_eq!(
        p.status.statuses(),
        vec![
            GuardStatus::Displaced,
            GuardStatus::TouchConfirmed,
            GuardStatus::Watching,
        ]
    );
}

// ── Cancellation end-to-end ───────────────────────────────────────────────────

#[test]
fn test_cancelled_teleport_never_touches_the_cursor() {
    // Arrange
    let p = start_pipeline(pos(0, 0));

    // Act – a jump followed by six moves (tablet-style) and a release
    p.source.inject_event(PointerEvent::Move(pos(700, 0)));
    for i in 0..6 {
        p.source.inject_event(PointerEvent::Move(pos(710 + i, 5)));
    }
    p.source.inject_event(PointerEvent::ButtonUp);
    p.source.stop();
    p.pump.join().expect("pump must drain and exit");

    // Assert – give the coordinator ample time to (wrongly) act
    thread::sleep(SETTLE_DELAY * 3);
    assert!(p.cursor.set_calls().is_empty(), "no restore after cancellation");
}

// ── Shutdown ──────────────────────────────────────────────────────────────────

#[test]
fn test_stopping_the_source_unblocks_the_pump_so_the_runtime_can_shut_down() {
    // Arrange – the pump runs as a blocking task on a runtime, exactly
    // as the binary wires it; runtime shutdown waits for blocking tasks
    let runtime = tokio::runtime::Runtime::new().expect("runtime must build");
    let source = MockPointerSource::new();
    let rx = source.start().expect("mock source must start");
    let slot = Arc::new(RestoreSlot::new());
    let status = Arc::new(RecordingStatusSink::new());
    let mut guard = CursorGuard::new(pos(0, 0), slot, status as Arc<dyn StatusSink>);
    let _pump = runtime.spawn_blocking(move || {
        while let Ok(event) = rx.recv() {
            guard.handle_event(event);
        }
    });

    // Act – deliver a little traffic, then stop the source and shut the
    // runtime down on a side thread
    source.inject_event(PointerEvent::Move(pos(1, 1)));
    source.stop();
    let (done_tx, done_rx) = std::sync::mpsc::channel();
    thread::spawn(move || {
        drop(runtime);
        let _ = done_tx.send(());
    });

    // Assert – shutdown can only complete if stop() disconnected the
    // channel and the recv loop ended
    done_rx
        .recv_timeout(Duration::from_secs(2))
        .expect("runtime shutdown must complete once the source is stopped");
}

// ── Mailbox semantics through the coordinator ─────────────────────────────────

#[test]
fn test_rapid_successive_submissions_apply_only_the_newest() {
    // Arrange – drive the slot directly; the guard is not needed here
    let cursor = Arc::new(RecordingCursor::new(pos(0, 0)));
    let status = Arc::new(RecordingStatusSink::new());
    let slot = Arc::new(RestoreSlot::new());
    let _restore = RestoreCoordinator::new(
        Arc::clone(&slot),
        Arc::clone(&cursor) as Arc<dyn CursorPort>,
        status as Arc<dyn StatusSink>,
    )
    .spawn()
    .expect("restore thread must spawn");

    // Act – the second submission lands while the first is still inside
    // its settle delay
    slot.submit(pos(11, 11));
    thread::sleep(Duration::from_millis(10));
    slot.submit(pos(22, 22));

    // Assert
    assert!(wait_for_set_calls(&cursor, 1, Duration::from_secs(2)));
    thread::sleep(SETTLE_DELAY * 2);
    let calls = cursor.set_calls();
    assert_eq!(calls.len(), 1, "superseded submission must not be applied");
    assert_eq!(calls[0].0, pos(22, 22));
}

#[test]
fn test_spaced_submissions_are_each_applied_once() {
    // Arrange
    let cursor = Arc::new(RecordingCursor::new(pos(0, 0)));
    let status = Arc::new(RecordingStatusSink::new());
    let slot = Arc::new(RestoreSlot::new());
    let _restore = RestoreCoordinator::new(
        Arc::clone(&slot),
        Arc::clone(&cursor) as Arc<dyn CursorPort>,
        status as Arc<dyn StatusSink>,
    )
    .spawn()
    .expect("restore thread must spawn");

    // Act – wait for the first restore before submitting the second
    slot.submit(pos(1, 2));
    assert!(wait_for_set_calls(&cursor, 1, Duration::from_secs(2)));
    slot.submit(pos(3, 4));
    assert!(wait_for_set_calls(&cursor, 2, Duration::from_secs(2)));

    // Assert
    let calls = cursor.set_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, pos(1, 2));
    assert_eq!(calls[1].0, pos(3, 4));
}

#[test]
fn test_restore_is_not_applied_before_the_settle_delay() {
    // Arrange
    let cursor = Arc::new(RecordingCursor::new(pos(0, 0)));
    let status = Arc::new(RecordingStatusSink::new());
    let slot = Arc::new(RestoreSlot::new());
    let _restore = RestoreCoordinator::new(
        Arc::clone(&slot),
        Arc::clone(&cursor) as Arc<dyn CursorPort>,
        status as Arc<dyn StatusSink>,
    )
    .spawn()
    .expect("restore thread must spawn");

    // Act
    slot.submit(pos(9, 9));
    thread::sleep(Duration::from_millis(30));

    // Assert – well inside the settle delay, nothing may have happened
    assert!(cursor.set_calls().is_empty(), "restore must not land early");
    assert!(wait_for_set_calls(&cursor, 1, Duration::from_secs(2)));
}
