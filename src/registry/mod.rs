//! Slide registry orchestrator.
//!
//! The registry is the explicit injection point for carousel content: slides
//! and their indicators are handed over once and never looked up again.

mod core;

pub use self::core::{Indicator, Slide, SlideIndex, SlideRegistry};
