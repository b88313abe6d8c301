use serde_json::json;

use crate::config::CarouselConfig;
use crate::error::{Result, WidgetError};
use crate::event::{EventFlow, PageEvent};
use crate::geometry::Rect;
use crate::input::{ControlHitAreas, InputRouter};
use crate::logging::{CAROUSEL_TARGET, LogLevel, Logger, emit, json_kv};
use crate::registry::{Indicator, Slide, SlideRegistry};
use crate::render::{MemorySurface, SlideSurface};
use crate::widgets::{PageContext, PageWidget};

use super::core::Carousel;

/// Builds the display surface once the registry and track area are known.
pub type SurfaceFactory = Box<dyn FnOnce(&SlideRegistry, Rect) -> Box<dyn SlideSurface>>;

/// Structural elements the carousel needs from the page.
#[derive(Debug, Clone, Default)]
pub struct CarouselMarkup {
    /// Track area; hover and control hit-testing are measured against it.
    pub track: Option<Rect>,
    pub slides: Vec<Slide>,
    /// Explicit indicators; one labeled indicator per slide when absent.
    pub indicators: Option<Vec<Indicator>>,
    /// Explicit control hit areas; the bottom-row strip when absent.
    pub controls: Option<ControlHitAreas>,
}

/// Carousel state machine plus the router feeding it.
pub struct CarouselWidget {
    carousel: Carousel<Box<dyn SlideSurface>>,
    router: InputRouter,
}

impl CarouselWidget {
    pub fn mount(
        markup: Option<&CarouselMarkup>,
        surface_factory: Option<SurfaceFactory>,
        config: &CarouselConfig,
        logger: Option<Logger>,
    ) -> Result<Self> {
        let markup = markup.ok_or(WidgetError::MissingElement("carousel"))?;
        let track = markup
            .track
            .ok_or(WidgetError::MissingElement("carousel-track"))?;

        let registry = match &markup.indicators {
            Some(indicators) => SlideRegistry::register(markup.slides.clone(), indicators.clone())?,
            None => SlideRegistry::with_default_indicators(markup.slides.clone())?,
        };
        let controls = markup
            .controls
            .clone()
            .unwrap_or_else(|| ControlHitAreas::strip(track, registry.len()));
        let router = InputRouter::new(track, controls, config.key_scope);

        let surface: Box<dyn SlideSurface> = match surface_factory {
            Some(factory) => factory(&registry, track),
            None => Box::new(MemorySurface::new(registry.len())),
        };
        let carousel = Carousel::new(registry, surface, config, logger);
        Ok(Self { carousel, router })
    }

    pub fn carousel(&self) -> &Carousel<Box<dyn SlideSurface>> {
        &self.carousel
    }

    pub fn carousel_mut(&mut self) -> &mut Carousel<Box<dyn SlideSurface>> {
        &mut self.carousel
    }

    pub fn router(&self) -> &InputRouter {
        &self.router
    }
}

impl PageWidget for CarouselWidget {
    fn name(&self) -> &str {
        "carousel"
    }

    fn on_event(&mut self, ctx: &mut PageContext, event: &PageEvent) -> Result<EventFlow> {
        if let PageEvent::Tick { elapsed } = event {
            self.carousel.advance(*elapsed);
            ctx.record_slide_changes(self.carousel.take_slide_changes());
            return Ok(EventFlow::Continue);
        }

        let Some(command) = self.router.route(event) else {
            return Ok(EventFlow::Continue);
        };
        if self.carousel.is_torn_down() {
            return Ok(EventFlow::Continue);
        }
        self.carousel.apply(command);
        ctx.record_slide_changes(self.carousel.take_slide_changes());
        Ok(EventFlow::Consumed)
    }

    fn teardown(&mut self) {
        self.carousel.teardown();
    }
}

impl std::fmt::Debug for CarouselWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarouselWidget")
            .field("state", &self.carousel.state())
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}

/// Log why the carousel stayed off the page. Structural gaps are quiet.
pub(crate) fn log_skipped(logger: Option<&Logger>, err: &WidgetError) {
    let level = if err.is_soft() {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    };
    emit(
        logger,
        level,
        CAROUSEL_TARGET,
        "carousel_skipped",
        [json_kv("reason", json!(err.to_string()))],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Control, Region};

    fn markup(count: usize) -> CarouselMarkup {
        CarouselMarkup {
            track: Some(Rect::new(0, 0, 40, 10)),
            slides: (0..count)
                .map(|i| Slide::new(format!("slide {i}"), "body"))
                .collect(),
            indicators: None,
            controls: None,
        }
    }

    #[test]
    fn missing_track_or_slides_skip_mount() {
        let config = CarouselConfig::default();
        let mut no_track = markup(3);
        no_track.track = None;
        let err = CarouselWidget::mount(Some(&no_track), None, &config, None).unwrap_err();
        assert!(matches!(err, WidgetError::MissingElement("carousel-track")));

        let err = CarouselWidget::mount(Some(&markup(0)), None, &config, None).unwrap_err();
        assert!(matches!(err, WidgetError::EmptyRegistry));
        assert!(CarouselWidget::mount(None, None, &config, None).is_err());
    }

    #[test]
    fn surface_factory_receives_registry_and_track() {
        let surface = MemorySurface::new(3);
        let handle = surface.clone();
        let factory: SurfaceFactory = Box::new(move |registry: &SlideRegistry, track: Rect| -> Box<dyn SlideSurface> {
            assert_eq!(registry.len(), 3);
            assert_eq!(track, Rect::new(0, 0, 40, 10));
            Box::new(surface)
        });
        let widget =
            CarouselWidget::mount(Some(&markup(3)), Some(factory), &CarouselConfig::default(), None)
                .unwrap();
        assert_eq!(widget.carousel().slide_count(), 3);
        assert_eq!(handle.snapshot().active_slides(), vec![0]);
    }

    #[test]
    fn routed_events_drive_the_carousel() {
        let mut widget =
            CarouselWidget::mount(Some(&markup(3)), None, &CarouselConfig::default(), None)
                .unwrap();
        let mut ctx = PageContext::new();

        let flow = widget
            .on_event(&mut ctx, &PageEvent::Activate(Control::CarouselNext))
            .unwrap();
        assert_eq!(flow, EventFlow::Consumed);
        assert_eq!(widget.carousel().current_index(), 1);

        widget
            .on_event(&mut ctx, &PageEvent::PointerEntered(Region::Carousel))
            .unwrap();
        assert!(!widget.carousel().is_playing());
        widget
            .on_event(&mut ctx, &PageEvent::PointerEntered(Region::Carousel))
            .unwrap();
        widget
            .on_event(&mut ctx, &PageEvent::PointerLeft(Region::Carousel))
            .unwrap();
        assert!(widget.carousel().is_playing());
        assert_eq!(widget.carousel().clock().active_timers(), 1);
        assert_eq!(ctx.slide_changes(), 1);
    }
}
