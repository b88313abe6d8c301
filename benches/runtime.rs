use std::hint::black_box;
use std::io;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use showcase::logging::NullSink;
use showcase::{
    AnsiSurface, CarouselMarkup, Control, Logger, Page, PageEvent, PageMarkup, PageRuntime,
    PageServices, Rect, Region, RuntimeConfig, Slide, SlideRegistry, SlideSurface, SurfaceFactory,
    display_width,
};

const TRACK: Rect = Rect::new(0, 0, 80, 12);

fn carousel_script(c: &mut Criterion) {
    let script = scripted_events();
    c.bench_function("runtime_carousel_script", |b| {
        b.iter(|| {
            let mut runtime = build_runtime(None);
            runtime
                .run_scripted(black_box(script.clone()))
                .expect("scripted run");
        });
    });
}

fn ansi_carousel_script(c: &mut Criterion) {
    let script = scripted_events();
    c.bench_function("runtime_ansi_carousel_script", |b| {
        b.iter(|| {
            let factory: SurfaceFactory =
                Box::new(|registry: &SlideRegistry, track: Rect| -> Box<dyn SlideSurface> {
                    Box::new(AnsiSurface::new(io::sink(), track, registry))
                });
            let mut runtime = build_runtime(Some(factory));
            runtime
                .run_scripted(black_box(script.clone()))
                .expect("scripted run");
        });
    });
}

fn width_of_slide_text(c: &mut Criterion) {
    let text = "\u{1b}[1mShip faster\u{1b}[0m · preview every change before it merges";
    c.bench_function("display_width_slide_text", |b| {
        b.iter(|| display_width(black_box(text)));
    });
}

fn build_runtime(factory: Option<SurfaceFactory>) -> PageRuntime {
    let markup = PageMarkup {
        carousel: Some(CarouselMarkup {
            track: Some(TRACK),
            slides: (0..12)
                .map(|i| Slide::new(format!("Slide {i}"), "Body text for the benchmark slide."))
                .collect(),
            indicators: None,
            controls: None,
        }),
        ..PageMarkup::default()
    };
    let logger = Logger::new(NullSink);
    let mut services = PageServices::default().with_logger(logger.clone());
    if let Some(factory) = factory {
        services = services.with_surface_factory(factory);
    }
    let page = Page::initialize(&markup, services);

    let mut config = RuntimeConfig::default().with_logger(logger);
    config.metrics_interval = Duration::from_millis(0);
    config.enable_metrics();
    PageRuntime::with_config(page, config)
}

fn scripted_events() -> Vec<PageEvent> {
    let mut events = Vec::with_capacity(256);
    for round in 0..40 {
        events.push(PageEvent::Tick {
            elapsed: Duration::from_millis(1700),
        });
        events.push(PageEvent::Key(KeyEvent::new(
            if round % 3 == 0 {
                KeyCode::Left
            } else {
                KeyCode::Right
            },
            KeyModifiers::NONE,
        )));
        events.push(PageEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column: (round * 3) as u16,
            row: 4,
            modifiers: KeyModifiers::NONE,
        }));
        events.push(PageEvent::Activate(Control::CarouselIndicator(round % 12)));
    }
    events.push(PageEvent::PointerLeft(Region::Carousel));
    events
}

criterion_group!(benches, carousel_script, ansi_carousel_script, width_of_slide_text);
criterion_main!(benches);
