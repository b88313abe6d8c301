use serde_json::json;

use crate::error::Result;
use crate::event::{Control, EventFlow, PageEvent};
use crate::logging::{LogLevel, Logger, WIDGETS_TARGET, emit, json_kv};

use super::{PageContext, PageWidget};

pub const FOOTER_LABEL: &str = "Close";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView {
    pub title: String,
    pub message: String,
    pub footer_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    CloseButton,
    FooterAction,
    Backdrop,
}

impl DismissReason {
    fn as_str(self) -> &'static str {
        match self {
            DismissReason::CloseButton => "close_button",
            DismissReason::FooterAction => "footer_action",
            DismissReason::Backdrop => "backdrop",
        }
    }
}

/// Feedback dialog. Showing always replaces the open dialog.
#[derive(Debug, Default)]
pub struct Dialog {
    current: Option<DialogView>,
    shown: u64,
    logger: Option<Logger>,
}

impl Dialog {
    pub fn new(logger: Option<Logger>) -> Self {
        Self {
            logger,
            ..Self::default()
        }
    }

    pub fn show(&mut self, title: impl Into<String>, message: impl Into<String>) {
        let view = DialogView {
            title: title.into(),
            message: message.into(),
            footer_label: FOOTER_LABEL.to_string(),
        };
        emit(
            self.logger.as_ref(),
            LogLevel::Debug,
            WIDGETS_TARGET,
            "dialog_shown",
            [
                json_kv("title", json!(view.title)),
                json_kv("replaced", json!(self.current.is_some())),
            ],
        );
        self.current = Some(view);
        self.shown += 1;
    }

    pub fn dismiss(&mut self, reason: DismissReason) -> Option<DialogView> {
        let closed = self.current.take();
        if closed.is_some() {
            emit(
                self.logger.as_ref(),
                LogLevel::Debug,
                WIDGETS_TARGET,
                "dialog_dismissed",
                [json_kv("reason", reason.as_str())],
            );
        }
        closed
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&DialogView> {
        self.current.as_ref()
    }

    /// Total number of dialogs shown since mount.
    pub fn shown(&self) -> u64 {
        self.shown
    }
}

impl PageWidget for Dialog {
    fn name(&self) -> &str {
        "dialog"
    }

    fn on_event(&mut self, _ctx: &mut PageContext, event: &PageEvent) -> Result<EventFlow> {
        let reason = match event {
            PageEvent::Activate(Control::DialogClose) => DismissReason::CloseButton,
            PageEvent::Activate(Control::DialogFooter) => DismissReason::FooterAction,
            PageEvent::Activate(Control::DialogBackdrop) => DismissReason::Backdrop,
            _ => return Ok(EventFlow::Continue),
        };
        Ok(match self.dismiss(reason) {
            Some(_) => EventFlow::Consumed,
            None => EventFlow::Continue,
        })
    }
}
