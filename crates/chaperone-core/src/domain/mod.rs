//! Domain entities for Cursor Chaperone.
//!
//! Pure business logic with no infrastructure dependencies.  Everything
//! here can be compiled and tested on any platform without a display,
//! an input device, or any external setup.

/// Teleport detection — the core domain concept.
///
/// See [`detector::TeleportDetector`] for the main type.
pub mod detector;
