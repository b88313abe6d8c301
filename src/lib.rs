//! Interactive landing-page widgets driven by a single-threaded event loop.
//!
//! The centerpiece is an autoplaying [`Carousel`]: a wraparound state machine
//! with a restartable rotation clock, fade transitions and keyboard, pointer
//! and hover input. Around it sit a subscription form with email validation,
//! a feedback dialog, a persisted light/dark toggle and an exclusive FAQ
//! accordion. [`Page::initialize`] mounts whatever subset the markup provides
//! and [`PageRuntime`] feeds it events, time included.

pub mod carousel;
pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod page;
pub mod registry;
pub mod render;
pub mod runtime;
pub mod store;
pub mod widgets;
pub mod width;

pub use carousel::{
    Carousel, CarouselMarkup, CarouselState, CarouselWidget, NavigationCause, SurfaceFactory,
};
pub use clock::{DEFAULT_INTERVAL, RotationClock, TimerHandle};
pub use config::{CarouselConfig, PageConfig, ThemeConfig};
pub use error::{Result, WidgetError};
pub use event::{Control, EventFlow, PageEvent, Region};
pub use geometry::{Rect, Size};
pub use input::{CarouselCommand, ControlHitAreas, InputRouter, KeyScope};
pub use logging::{LogEvent, LogFields, LogLevel, Logger, LoggingError, LoggingResult};
pub use metrics::{MetricSnapshot, RuntimeMetrics};
pub use page::{DispatchOutcome, Page, PageMarkup, PageServices};
pub use registry::{Indicator, Slide, SlideIndex, SlideRegistry};
pub use render::{
    AnsiSurface, DEFAULT_FADE, MemorySurface, Opacity, SlideSurface, SurfaceSnapshot,
    TransitionRenderer,
};
pub use runtime::driver::cli::{CliDriver, CliDriverError, DriverResult};
pub use runtime::{PageRuntime, RuntimeConfig};
pub use store::{JsonFileStore, MemoryStore, PreferenceStore, SharedStore};
pub use widgets::{
    Accordion, AccordionMarkup, Dialog, DisplayAttribute, DisplayMode, FormMarkup, PageContext,
    PageWidget, SubscribeForm, ThemeToggle, ThemeToggleMarkup,
};
pub use width::{display_width, truncate_display};
