//! Page widgets and the contract the page uses to drive them.
//!
//! Widgets receive events through [`PageWidget::on_event`] and talk to each
//! other only through requests queued on the [`PageContext`], which the page
//! applies after the handler returns.

pub mod accordion;
pub mod dialog;
pub mod form;
pub mod theme;

use crate::error::Result;
use crate::event::{EventFlow, PageEvent};

pub use accordion::{Accordion, AccordionItem, AccordionItemMarkup, AccordionMarkup};
pub use dialog::{Dialog, DialogView, DismissReason};
pub use form::{EmailError, FormMarkup, SubmitOutcome, SubscribeForm, validate_email};
pub use theme::{DisplayAttribute, DisplayMode, ThemeToggle, ThemeToggleMarkup};

/// Dialog opening requested by another widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRequest {
    pub title: String,
    pub message: String,
}

/// Side effects a widget asks for while handling one event.
#[derive(Debug, Default)]
pub struct PageContext {
    dialog_requests: Vec<DialogRequest>,
    slide_changes: u64,
}

impl PageContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a dialog; it replaces whatever dialog is open once applied.
    pub fn show_dialog(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.dialog_requests.push(DialogRequest {
            title: title.into(),
            message: message.into(),
        });
    }

    pub fn record_slide_changes(&mut self, count: u64) {
        self.slide_changes += count;
    }

    pub fn slide_changes(&self) -> u64 {
        self.slide_changes
    }

    pub fn take_dialog_requests(&mut self) -> Vec<DialogRequest> {
        std::mem::take(&mut self.dialog_requests)
    }
}

/// Behaviour shared by every widget mounted on the page.
pub trait PageWidget {
    fn name(&self) -> &str;

    fn on_event(&mut self, ctx: &mut PageContext, event: &PageEvent) -> Result<EventFlow>;

    /// Release long-lived resources before the page goes away.
    fn teardown(&mut self) {}
}
