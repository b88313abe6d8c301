use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde_json::json;

use crate::config::PageConfig;
use crate::error::Result;
use crate::event::PageEvent;
use crate::geometry::Size;
use crate::logging::{LogLevel, Logger, RUNTIME_TARGET, event_with_fields, json_kv};
use crate::metrics::RuntimeMetrics;
use crate::page::{DispatchOutcome, Page};

pub mod driver;

/// Configuration knobs for the runtime loop.
#[derive(Clone)]
pub struct RuntimeConfig {
    /// Interval between synthetic tick events.
    pub tick_interval: Duration,
    /// Optional structured logger used by the runtime.
    pub logger: Option<Logger>,
    /// Metrics accumulator used for periodic snapshots.
    pub metrics: Option<Arc<Mutex<RuntimeMetrics>>>,
    /// Interval between metrics snapshot emissions. Zero disables snapshots.
    pub metrics_interval: Duration,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            logger: None,
            metrics: None,
            metrics_interval: Duration::from_secs(5),
            metrics_target: format!("{RUNTIME_TARGET}.metrics"),
        }
    }
}

impl RuntimeConfig {
    pub fn from_page_config(config: &PageConfig) -> Self {
        Self {
            tick_interval: config.tick_interval(),
            ..Self::default()
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(RuntimeMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<RuntimeMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Single-threaded host loop: every event, ticks included, runs to
/// completion on the page before the next one is read.
pub struct PageRuntime {
    page: Page,
    config: RuntimeConfig,
    should_exit: bool,
    start_instant: Option<Instant>,
    last_metrics_emit: Option<Instant>,
}

impl PageRuntime {
    pub fn new(page: Page) -> Self {
        Self::with_config(page, RuntimeConfig::default())
    }

    pub fn with_config(page: Page, config: RuntimeConfig) -> Self {
        Self {
            page,
            config,
            should_exit: false,
            start_instant: None,
            last_metrics_emit: None,
        }
    }

    pub fn config_mut(&mut self) -> &mut RuntimeConfig {
        &mut self.config
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn into_page(self) -> Page {
        self.page
    }

    /// Stop after the event currently being handled.
    pub fn request_exit(&mut self) {
        if !self.should_exit {
            self.should_exit = true;
            self.log_runtime_event(LogLevel::Info, "exit_requested", std::iter::empty());
        }
    }

    /// Drive the page from the terminal until `q` or Ctrl+C.
    pub fn run(&mut self) -> Result<()> {
        self.bootstrap();
        let mut last_tick = Instant::now();

        while !self.should_exit {
            let timeout = self
                .config
                .tick_interval
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_millis(0));

            if event::poll(timeout)? {
                if let Some(page_event) = map_event(event::read()?) {
                    self.handle(page_event)?;
                }
                if self.should_exit {
                    break;
                }
            }

            if last_tick.elapsed() >= self.config.tick_interval {
                let now = Instant::now();
                let elapsed = now.duration_since(last_tick);
                last_tick = now;
                self.dispatch(PageEvent::Tick { elapsed })?;
            }

            self.maybe_emit_metrics();
        }

        self.finalize();
        Ok(())
    }

    /// Feed a fixed event sequence through the same dispatch path as [`run`](Self::run).
    pub fn run_scripted<I>(&mut self, events: I) -> Result<()>
    where
        I: IntoIterator<Item = PageEvent>,
    {
        self.bootstrap();
        for event in events {
            self.handle(event)?;
            if self.should_exit {
                break;
            }
        }
        self.finalize();
        Ok(())
    }

    /// Dispatch one event to the page and account for it.
    pub fn dispatch(&mut self, event: PageEvent) -> Result<DispatchOutcome> {
        let outcome = self.page.dispatch(&event)?;
        self.record_metrics(&event, &outcome);
        self.log_runtime_event(
            LogLevel::Debug,
            "event_dispatched",
            [
                json_kv("event", json!(event.describe())),
                json_kv("consumed", json!(outcome.flow == crate::event::EventFlow::Consumed)),
                json_kv("slide_changes", json!(outcome.slide_changes)),
            ],
        );
        self.maybe_emit_metrics();
        Ok(outcome)
    }

    fn handle(&mut self, event: PageEvent) -> Result<()> {
        if let PageEvent::Key(key) = &event {
            if is_exit_key(key) {
                self.request_exit();
                return Ok(());
            }
        }
        if let PageEvent::Resize(size) = &event {
            self.log_runtime_event(
                LogLevel::Info,
                "resized",
                [
                    json_kv("width", json!(size.width)),
                    json_kv("height", json!(size.height)),
                ],
            );
        }
        self.dispatch(event).map(|_| ())
    }

    fn bootstrap(&mut self) {
        self.should_exit = false;
        self.ensure_metrics_initialized();
        let now = Instant::now();
        self.start_instant = Some(now);
        self.last_metrics_emit = Some(now);
        self.log_runtime_event(
            LogLevel::Info,
            "runtime_started",
            [
                json_kv("widgets", json!(self.page.widget_names())),
                json_kv(
                    "tick_interval_ms",
                    json!(self.config.tick_interval.as_millis() as u64),
                ),
            ],
        );
    }

    fn finalize(&mut self) {
        self.page.teardown();
        let uptime_ms = self
            .start_instant
            .map(|start| start.elapsed().as_millis() as u64)
            .unwrap_or(0);
        self.log_runtime_event(
            LogLevel::Info,
            "runtime_stopped",
            [json_kv("uptime_ms", json!(uptime_ms))],
        );
    }

    fn ensure_metrics_initialized(&mut self) {
        if self.config.metrics.is_none() && self.config.metrics_interval > Duration::from_millis(0)
        {
            self.config.enable_metrics();
        }
    }

    fn log_runtime_event<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, RUNTIME_TARGET, message, fields);
            let _ = logger.log_event(event);
        }
    }

    fn record_metrics(&self, event: &PageEvent, outcome: &DispatchOutcome) {
        let Some(metrics) = self.config.metrics.as_ref() else {
            return;
        };
        if let Ok(mut guard) = metrics.lock() {
            guard.record_event();
            if matches!(event, PageEvent::Tick { .. }) {
                guard.record_tick();
            }
            guard.record_slide_changes(outcome.slide_changes);
            for _ in 0..outcome.dialogs_opened {
                guard.record_dialog();
            }
        }
    }

    fn maybe_emit_metrics(&mut self) {
        if self.config.metrics.is_none() || self.config.metrics_interval.is_zero() {
            return;
        }

        let now = Instant::now();
        match self.last_metrics_emit {
            Some(last) if now.duration_since(last) < self.config.metrics_interval => return,
            _ => self.last_metrics_emit = Some(now),
        }

        let uptime = self
            .start_instant
            .map(|start| now.duration_since(start))
            .unwrap_or_default();

        if let (Some(logger), Some(metrics)) =
            (self.config.logger.as_ref(), self.config.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let target = self.config.metrics_target.as_str();
                let _ = logger.log_event(guard.snapshot(uptime).to_log_event(target));
            }
        }
    }
}

fn map_event(event: CrosstermEvent) -> Option<PageEvent> {
    match event {
        CrosstermEvent::Key(key) => Some(PageEvent::Key(key)),
        CrosstermEvent::Mouse(mouse) => Some(PageEvent::Mouse(mouse)),
        CrosstermEvent::Resize(width, height) => Some(PageEvent::Resize(Size::new(width, height))),
        CrosstermEvent::Paste(_) | CrosstermEvent::FocusGained | CrosstermEvent::FocusLost => None,
    }
}

fn is_exit_key(key: &KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    match key.code {
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q') => key.modifiers.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::CarouselMarkup;
    use crate::geometry::Rect;
    use crate::logging::MemorySink;
    use crate::page::{PageMarkup, PageServices};
    use crate::registry::Slide;

    fn page() -> Page {
        let markup = PageMarkup {
            carousel: Some(CarouselMarkup {
                track: Some(Rect::new(0, 0, 30, 6)),
                slides: (0..4).map(|i| Slide::new(format!("slide {i}"), "")).collect(),
                indicators: None,
                controls: None,
            }),
            ..PageMarkup::default()
        };
        Page::initialize(&markup, PageServices::default())
    }

    fn tick(ms: u64) -> PageEvent {
        PageEvent::Tick {
            elapsed: Duration::from_millis(ms),
        }
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> PageEvent {
        PageEvent::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn scripted_run_stops_on_exit_key() {
        let mut runtime = PageRuntime::new(page());
        let metrics = {
            runtime.config_mut().enable_metrics();
            runtime.config_mut().metrics_handle().unwrap()
        };
        runtime
            .run_scripted([
                tick(5000),
                tick(5000),
                key(KeyCode::Char('q'), KeyModifiers::NONE),
                tick(5000),
            ])
            .unwrap();

        let carousel = runtime.page().carousel().unwrap().carousel();
        assert_eq!(carousel.current_index(), 2);
        assert!(!carousel.is_playing());
        assert!(runtime.page().is_torn_down());

        let snapshot = metrics.lock().unwrap().snapshot(Duration::ZERO);
        assert_eq!(snapshot.events, 2);
        assert_eq!(snapshot.ticks, 2);
        assert_eq!(snapshot.slide_changes, 2);
    }

    #[test]
    fn ctrl_c_exits_but_plain_c_does_not() {
        assert!(is_exit_key(&KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!is_exit_key(&KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::NONE
        )));
        assert!(!is_exit_key(&KeyEvent::new(
            KeyCode::Char('q'),
            KeyModifiers::SHIFT
        )));
    }

    #[test]
    fn lifecycle_is_logged() {
        let sink = MemorySink::new();
        let config = RuntimeConfig::default().with_logger(Logger::new(sink.clone()));
        let mut runtime = PageRuntime::with_config(page(), config);
        runtime
            .run_scripted([key(KeyCode::Right, KeyModifiers::NONE)])
            .unwrap();

        let messages = sink.messages(RUNTIME_TARGET);
        assert_eq!(messages.first().map(String::as_str), Some("runtime_started"));
        assert!(messages.contains(&"event_dispatched".to_string()));
        assert_eq!(messages.last().map(String::as_str), Some("runtime_stopped"));
    }

    #[test]
    fn tick_interval_follows_page_config() {
        let config = PageConfig {
            tick_interval_ms: 40,
            ..PageConfig::default()
        };
        assert_eq!(
            RuntimeConfig::from_page_config(&config).tick_interval,
            Duration::from_millis(40)
        );
    }

    #[test]
    fn focus_and_paste_events_are_dropped() {
        assert!(map_event(CrosstermEvent::FocusGained).is_none());
        assert!(matches!(
            map_event(CrosstermEvent::Resize(80, 24)),
            Some(PageEvent::Resize(Size { width: 80, height: 24 }))
        ));
    }
}
