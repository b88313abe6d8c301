//! Events delivered by the host loop, one at a time, to the page widgets.

use std::time::Duration;

use crossterm::event::{KeyEvent, MouseEvent};

use crate::geometry::Size;
use crate::registry::SlideIndex;

/// Discrete, clickable controls on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    CarouselPrevious,
    CarouselNext,
    CarouselIndicator(SlideIndex),
    DialogClose,
    DialogFooter,
    DialogBackdrop,
    ThemeToggle,
    FaqItem(usize),
}

/// Hover-sensitive page regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Carousel,
}

#[derive(Debug, Clone)]
pub enum PageEvent {
    /// Time passing; the only way time reaches the widgets.
    Tick { elapsed: Duration },
    Key(KeyEvent),
    Mouse(MouseEvent),
    Activate(Control),
    PointerEntered(Region),
    PointerLeft(Region),
    /// Subscription form submitted with the raw field value.
    Submit { email: String },
    Resize(Size),
}

impl PageEvent {
    pub fn describe(&self) -> &'static str {
        match self {
            PageEvent::Tick { .. } => "tick",
            PageEvent::Key(_) => "key",
            PageEvent::Mouse(_) => "mouse",
            PageEvent::Activate(_) => "activate",
            PageEvent::PointerEntered(_) => "pointer_entered",
            PageEvent::PointerLeft(_) => "pointer_left",
            PageEvent::Submit { .. } => "submit",
            PageEvent::Resize(_) => "resize",
        }
    }
}

/// Control the propagation of an event across widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFlow {
    Continue,
    Consumed,
}
