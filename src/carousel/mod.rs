//! Carousel orchestrator.
//!
//! [`Carousel`] is the state machine: the single writer of the current index.
//! [`CarouselWidget`] wires it to the input router so the page can drive it.

mod core;
mod widget;

pub use self::core::{Carousel, CarouselState, NavigationCause};
pub use self::widget::{CarouselMarkup, CarouselWidget, SurfaceFactory};
pub(crate) use self::widget::log_skipped;
