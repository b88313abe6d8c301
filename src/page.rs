//! Page initialization entry point and single-task event dispatch.
//!
//! Each widget mounts independently: a missing structural element keeps that
//! widget off the page and leaves the others untouched.

use std::sync::Arc;

use serde_json::json;

use crate::carousel::{CarouselMarkup, CarouselWidget, SurfaceFactory, log_skipped};
use crate::config::PageConfig;
use crate::error::{Result, WidgetError};
use crate::event::{EventFlow, PageEvent};
use crate::logging::{LogLevel, Logger, PAGE_TARGET, emit, json_kv};
use crate::store::{MemoryStore, SharedStore};
use crate::widgets::{
    Accordion, AccordionMarkup, Dialog, DisplayAttribute, FormMarkup, PageContext, PageWidget,
    SubscribeForm, ThemeToggle, ThemeToggleMarkup,
};

/// Structural elements found on the page, one optional section per widget.
#[derive(Debug, Clone, Default)]
pub struct PageMarkup {
    pub carousel: Option<CarouselMarkup>,
    pub subscribe_form: Option<FormMarkup>,
    pub theme_toggle: Option<ThemeToggleMarkup>,
    pub faq: Option<AccordionMarkup>,
}

/// Collaborators injected at initialization.
pub struct PageServices {
    pub config: PageConfig,
    pub store: SharedStore,
    pub display: DisplayAttribute,
    pub logger: Option<Logger>,
    pub surface_factory: Option<SurfaceFactory>,
}

impl PageServices {
    pub fn new(config: PageConfig) -> Self {
        Self {
            config,
            store: Arc::new(MemoryStore::new()),
            display: DisplayAttribute::default(),
            logger: None,
            surface_factory: None,
        }
    }

    pub fn with_store(mut self, store: SharedStore) -> Self {
        self.store = store;
        self
    }

    pub fn with_display(mut self, display: DisplayAttribute) -> Self {
        self.display = display;
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_surface_factory(mut self, factory: SurfaceFactory) -> Self {
        self.surface_factory = Some(factory);
        self
    }
}

impl Default for PageServices {
    fn default() -> Self {
        Self::new(PageConfig::default())
    }
}

/// Result of dispatching one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub flow: EventFlow,
    pub slide_changes: u64,
    pub dialogs_opened: u64,
}

/// All widgets of the page. The dialog always mounts; the rest are optional.
pub struct Page {
    dialog: Dialog,
    form: Option<SubscribeForm>,
    theme: Option<ThemeToggle>,
    faq: Option<Accordion>,
    carousel: Option<CarouselWidget>,
    display: DisplayAttribute,
    logger: Option<Logger>,
    torn_down: bool,
}

impl Page {
    pub fn initialize(markup: &PageMarkup, services: PageServices) -> Self {
        let PageServices {
            config,
            store,
            display,
            logger,
            surface_factory,
        } = services;

        let dialog = Dialog::new(logger.clone());
        let form = mount_or_skip(
            "subscribe_form",
            logger.as_ref(),
            SubscribeForm::mount(markup.subscribe_form.as_ref(), logger.clone()),
        );
        let theme = mount_or_skip(
            "theme_toggle",
            logger.as_ref(),
            ThemeToggle::mount(
                markup.theme_toggle.as_ref(),
                store,
                config.theme.storage_key.clone(),
                display.clone(),
                logger.clone(),
            ),
        );
        let faq = mount_or_skip(
            "faq_accordion",
            logger.as_ref(),
            Accordion::mount(markup.faq.as_ref(), logger.clone()),
        );
        let carousel = match CarouselWidget::mount(
            markup.carousel.as_ref(),
            surface_factory,
            &config.carousel,
            logger.clone(),
        ) {
            Ok(widget) => Some(widget),
            Err(err) => {
                log_skipped(logger.as_ref(), &err);
                None
            }
        };

        let page = Self {
            dialog,
            form,
            theme,
            faq,
            carousel,
            display,
            logger,
            torn_down: false,
        };
        emit(
            page.logger.as_ref(),
            LogLevel::Info,
            PAGE_TARGET,
            "page_initialized",
            [json_kv("widgets", json!(page.widget_names()))],
        );
        page
    }

    /// Run one event to completion across the widgets, in page order, until
    /// a widget consumes it. Dialog requests are applied afterwards.
    pub fn dispatch(&mut self, event: &PageEvent) -> Result<DispatchOutcome> {
        let mut outcome = DispatchOutcome {
            flow: EventFlow::Continue,
            slide_changes: 0,
            dialogs_opened: 0,
        };
        if self.torn_down {
            return Ok(outcome);
        }

        let mut ctx = PageContext::new();
        for widget in self.widgets_mut() {
            if widget.on_event(&mut ctx, event)? == EventFlow::Consumed {
                outcome.flow = EventFlow::Consumed;
                break;
            }
        }

        for request in ctx.take_dialog_requests() {
            self.dialog.show(request.title, request.message);
            outcome.dialogs_opened += 1;
        }
        outcome.slide_changes = ctx.slide_changes();
        Ok(outcome)
    }

    /// Cancel timers and stop accepting events.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        for widget in self.widgets_mut() {
            widget.teardown();
        }
        self.torn_down = true;
        emit(
            self.logger.as_ref(),
            LogLevel::Info,
            PAGE_TARGET,
            "page_torn_down",
            std::iter::empty(),
        );
    }

    pub fn widget_names(&self) -> Vec<&str> {
        let mut names = vec![self.dialog.name()];
        if let Some(form) = &self.form {
            names.push(form.name());
        }
        if let Some(theme) = &self.theme {
            names.push(theme.name());
        }
        if let Some(faq) = &self.faq {
            names.push(faq.name());
        }
        if let Some(carousel) = &self.carousel {
            names.push(carousel.name());
        }
        names
    }

    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    pub fn dialog_mut(&mut self) -> &mut Dialog {
        &mut self.dialog
    }

    pub fn form(&self) -> Option<&SubscribeForm> {
        self.form.as_ref()
    }

    pub fn theme(&self) -> Option<&ThemeToggle> {
        self.theme.as_ref()
    }

    pub fn faq(&self) -> Option<&Accordion> {
        self.faq.as_ref()
    }

    pub fn carousel(&self) -> Option<&CarouselWidget> {
        self.carousel.as_ref()
    }

    pub fn carousel_mut(&mut self) -> Option<&mut CarouselWidget> {
        self.carousel.as_mut()
    }

    pub fn display(&self) -> &DisplayAttribute {
        &self.display
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    fn widgets_mut(&mut self) -> Vec<&mut dyn PageWidget> {
        let mut widgets: Vec<&mut dyn PageWidget> = vec![&mut self.dialog];
        if let Some(form) = self.form.as_mut() {
            widgets.push(form);
        }
        if let Some(theme) = self.theme.as_mut() {
            widgets.push(theme);
        }
        if let Some(faq) = self.faq.as_mut() {
            widgets.push(faq);
        }
        if let Some(carousel) = self.carousel.as_mut() {
            widgets.push(carousel);
        }
        widgets
    }
}

fn mount_or_skip<W>(name: &str, logger: Option<&Logger>, mounted: Result<W>) -> Option<W> {
    match mounted {
        Ok(widget) => Some(widget),
        Err(err) => {
            log_skip(name, logger, &err);
            None
        }
    }
}

fn log_skip(name: &str, logger: Option<&Logger>, err: &WidgetError) {
    let level = if err.is_soft() {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    };
    emit(
        logger,
        level,
        PAGE_TARGET,
        "widget_skipped",
        [
            json_kv("widget", json!(name)),
            json_kv("reason", json!(err.to_string())),
        ],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Control;
    use crate::geometry::Rect;
    use crate::logging::MemorySink;
    use crate::registry::Slide;
    use crate::widgets::{AccordionItemMarkup, DisplayMode};

    fn full_markup() -> PageMarkup {
        PageMarkup {
            carousel: Some(CarouselMarkup {
                track: Some(Rect::new(0, 0, 40, 8)),
                slides: (0..3).map(|i| Slide::new(format!("s{i}"), "body")).collect(),
                indicators: None,
                controls: None,
            }),
            subscribe_form: Some(FormMarkup {
                field_name: "email".to_string(),
            }),
            theme_toggle: Some(ThemeToggleMarkup {
                label: "Theme".to_string(),
            }),
            faq: Some(AccordionMarkup {
                items: vec![AccordionItemMarkup {
                    question: "Why?".to_string(),
                    answer: "Because.".to_string(),
                    has_content_block: false,
                }],
            }),
        }
    }

    #[test]
    fn missing_carousel_leaves_other_widgets_mounted() {
        let sink = MemorySink::new();
        let mut markup = full_markup();
        if let Some(carousel) = markup.carousel.as_mut() {
            carousel.slides.clear();
        }
        let page = Page::initialize(
            &markup,
            PageServices::default().with_logger(Logger::new(sink.clone())),
        );

        assert!(page.carousel().is_none());
        assert!(page.form().is_some());
        assert!(page.theme().is_some());
        assert!(page.faq().is_some());
        assert!(
            sink.messages(crate::logging::CAROUSEL_TARGET)
                .contains(&"carousel_skipped".to_string())
        );
    }

    #[test]
    fn empty_markup_still_mounts_dialog() {
        let page = Page::initialize(&PageMarkup::default(), PageServices::default());
        assert_eq!(page.widget_names(), vec!["dialog"]);
    }

    #[test]
    fn valid_submission_opens_confirmation_dialog() {
        let mut page = Page::initialize(&full_markup(), PageServices::default());
        let outcome = page
            .dispatch(&PageEvent::Submit {
                email: "a@b.com".to_string(),
            })
            .unwrap();
        assert_eq!(outcome.flow, EventFlow::Consumed);
        assert_eq!(outcome.dialogs_opened, 1);
        assert!(page.dialog().current().unwrap().message.contains("a@b.com"));

        page.dispatch(&PageEvent::Activate(Control::DialogBackdrop))
            .unwrap();
        assert!(!page.dialog().is_open());
    }

    #[test]
    fn theme_toggle_updates_shared_attribute() {
        let display = DisplayAttribute::default();
        let mut page = Page::initialize(
            &full_markup(),
            PageServices::default().with_display(display.clone()),
        );
        page.dispatch(&PageEvent::Activate(Control::ThemeToggle))
            .unwrap();
        assert_eq!(display.get(), DisplayMode::Dark);
        assert_eq!(page.display().get(), DisplayMode::Dark);
    }

    #[test]
    fn ticks_reach_the_carousel() {
        let mut page = Page::initialize(&full_markup(), PageServices::default());
        let outcome = page
            .dispatch(&PageEvent::Tick {
                elapsed: std::time::Duration::from_secs(5),
            })
            .unwrap();
        assert_eq!(outcome.slide_changes, 1);
        assert_eq!(page.carousel().unwrap().carousel().current_index(), 1);
    }

    #[test]
    fn teardown_stops_autoplay_and_ignores_events() {
        let mut page = Page::initialize(&full_markup(), PageServices::default());
        page.teardown();
        assert!(!page.carousel().unwrap().carousel().is_playing());

        let outcome = page
            .dispatch(&PageEvent::Activate(Control::CarouselNext))
            .unwrap();
        assert_eq!(outcome.flow, EventFlow::Continue);
        assert_eq!(page.carousel().unwrap().carousel().current_index(), 0);
    }
}
