//! Transition rendering orchestrator.
//!
//! The [`TransitionRenderer`] owns the hand-off between slides; concrete
//! [`SlideSurface`] implementations decide where the result becomes visible.

mod ansi;
mod core;
mod memory;

pub use self::ansi::AnsiSurface;
pub use self::core::{DEFAULT_FADE, Opacity, SlideSurface, TransitionRenderer};
pub use self::memory::{MemorySurface, SurfaceSnapshot};
