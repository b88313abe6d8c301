//! Input routing orchestrator.
//!
//! Translates page events into carousel commands. The router never touches
//! carousel state; it only decides which operation an event asks for.

mod core;

pub use self::core::{CarouselCommand, ControlHitAreas, InputRouter, KeyScope};
