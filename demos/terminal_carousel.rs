//! Terminal carousel demo.
//!
//! Renders an autoplaying carousel in the alternate screen. Left/Right arrows
//! navigate, clicking the `‹ › ●` strip works too, hovering pauses, `q` exits.
//! Set `HEADLESS=1` (or run under CI) to play a scripted session instead.
//!
//! Usage: `cargo run --example terminal_carousel [config.json]`

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use showcase::logging::FileSink;
use showcase::{
    AnsiSurface, CarouselMarkup, CliDriver, DisplayAttribute, JsonFileStore, LogLevel, Logger,
    PageConfig, PageEvent, PageMarkup, PageRuntime, PageServices, Rect, RuntimeConfig, Slide,
    SlideRegistry, SlideSurface, SurfaceFactory, ThemeToggleMarkup,
};

const SLIDES: &[(&str, &str)] = &[
    ("Ship faster", "Preview every change in a live environment before it merges."),
    ("Stay in sync", "Comments, reviews and deploys land in one shared timeline."),
    ("Scale calmly", "Autoscaling keeps latency flat through the launch-day rush."),
    ("Own your data", "Export everything, any time, in open formats."),
    ("Start free", "No card required. Upgrade when the team grows."),
];

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => PageConfig::load(path)?,
        None => PageConfig::default(),
    };
    config.validate()?;

    let headless = std::env::var("CI").is_ok() || std::env::var("HEADLESS").is_ok();
    let logger = match std::env::var("SHOWCASE_LOG") {
        Ok(path) => Some(Logger::new(FileSink::new(path, 1 << 20)?).with_min_level(LogLevel::Debug)),
        Err(_) => None,
    };

    let display = DisplayAttribute::default();
    let store = JsonFileStore::open(std::env::temp_dir().join("showcase-preferences.json"))?;
    let surface_display = display.clone();
    let factory: SurfaceFactory = if headless {
        Box::new(move |registry: &SlideRegistry, track: Rect| -> Box<dyn SlideSurface> {
            Box::new(AnsiSurface::new(io::sink(), track, registry).with_display(surface_display))
        })
    } else {
        Box::new(move |registry: &SlideRegistry, track: Rect| -> Box<dyn SlideSurface> {
            Box::new(AnsiSurface::new(io::stdout(), track, registry).with_display(surface_display))
        })
    };

    let markup = PageMarkup {
        carousel: Some(CarouselMarkup {
            track: Some(Rect::new(2, 1, 64, 6)),
            slides: SLIDES
                .iter()
                .map(|(label, content)| Slide::new(*label, *content))
                .collect(),
            indicators: None,
            controls: None,
        }),
        theme_toggle: Some(ThemeToggleMarkup {
            label: "Theme".to_string(),
        }),
        ..PageMarkup::default()
    };

    let mut services = PageServices::new(config.clone())
        .with_store(Arc::new(store))
        .with_display(display)
        .with_surface_factory(factory);
    if let Some(logger) = logger.clone() {
        services = services.with_logger(logger);
    }
    let page = showcase::Page::initialize(&markup, services);

    let mut runtime_config = RuntimeConfig::from_page_config(&config);
    if let Some(logger) = logger {
        runtime_config = runtime_config.with_logger(logger);
    }
    let mut runtime = PageRuntime::with_config(page, runtime_config);

    if headless {
        let step = PageEvent::Tick {
            elapsed: Duration::from_millis(config.carousel.interval_ms),
        };
        runtime.run_scripted([
            step.clone(),
            PageEvent::Key(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE)),
            step,
            PageEvent::Key(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE)),
        ])?;
        let state = runtime
            .page()
            .carousel()
            .map(|widget| widget.carousel().state());
        println!("headless session finished: {state:?}");
        return Ok(());
    }

    CliDriver::new(runtime).run()?;
    Ok(())
}
