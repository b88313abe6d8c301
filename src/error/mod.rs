//! Error module orchestrator.
//!
//! Every widget reports failures through [`WidgetError`]; the page decides
//! which of them degrade to "feature inactive" and which propagate.

mod types;

pub use types::{Result, WidgetError};
