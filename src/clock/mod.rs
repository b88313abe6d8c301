//! Rotation clock orchestrator.
//!
//! The clock is an owned, cancellable timer fed with elapsed time by its
//! owner, so tests control time by choosing what to pass to `advance`.

mod core;

pub use self::core::{DEFAULT_INTERVAL, MIN_INTERVAL, RotationClock, TimerHandle};
