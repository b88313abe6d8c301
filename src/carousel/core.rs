use std::time::Duration;

use serde_json::json;

use crate::clock::{RotationClock, TimerHandle};
use crate::config::CarouselConfig;
use crate::input::CarouselCommand;
use crate::logging::{CAROUSEL_TARGET, LogLevel, Logger, emit, json_kv};
use crate::registry::{SlideIndex, SlideRegistry};
use crate::render::{SlideSurface, TransitionRenderer};

/// Observable carousel state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselState {
    pub current_index: SlideIndex,
    pub is_playing: bool,
    pub pending_timer: Option<TimerHandle>,
}

/// What asked for a slide change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationCause {
    Autoplay,
    Previous,
    Next,
    Jump,
    Direct,
}

impl NavigationCause {
    fn as_str(self) -> &'static str {
        match self {
            NavigationCause::Autoplay => "autoplay",
            NavigationCause::Previous => "previous",
            NavigationCause::Next => "next",
            NavigationCause::Jump => "jump",
            NavigationCause::Direct => "direct",
        }
    }

    fn is_manual(self) -> bool {
        !matches!(self, NavigationCause::Autoplay | NavigationCause::Direct)
    }
}

/// Timed, interruptible slide rotation.
///
/// Every navigation funnels through one wraparound step that updates the
/// index and renders the hand-off together, so the active slide and the
/// active indicator can never disagree. Manual navigation restarts the
/// autoplay cadence; autoplay ticks never do.
pub struct Carousel<S> {
    registry: SlideRegistry,
    current: SlideIndex,
    clock: RotationClock,
    interval: Duration,
    renderer: TransitionRenderer<S>,
    logger: Option<Logger>,
    torn_down: bool,
    unreported_changes: u64,
}

impl<S: SlideSurface> Carousel<S> {
    /// Show the first slide and start autoplay.
    pub fn new(
        registry: SlideRegistry,
        surface: S,
        config: &CarouselConfig,
        logger: Option<Logger>,
    ) -> Self {
        let renderer = TransitionRenderer::new(surface, registry.len(), config.fade());
        let mut carousel = Self {
            registry,
            current: 0,
            clock: RotationClock::new(),
            interval: config.interval(),
            renderer,
            logger,
            torn_down: false,
            unreported_changes: 0,
        };

        if let Err(err) = carousel.renderer.render(None, 0) {
            carousel.log_render_failure(&err);
        }
        let handle = carousel.clock.start(carousel.interval);
        emit(
            carousel.logger.as_ref(),
            LogLevel::Info,
            CAROUSEL_TARGET,
            "carousel_started",
            [
                json_kv("slides", json!(carousel.registry.len())),
                json_kv("interval_ms", json!(carousel.interval.as_millis() as u64)),
                json_kv("timer", json!(format!("{handle:?}"))),
            ],
        );
        carousel
    }

    /// Move to `target`, wrapping past either end: at or beyond the slide
    /// count resolves to the first slide, below zero to the last.
    pub fn go_to(&mut self, target: isize) -> SlideIndex {
        self.navigate(target, NavigationCause::Direct)
    }

    pub fn next(&mut self) -> SlideIndex {
        let index = self.navigate(self.offset(1), NavigationCause::Next);
        self.restart_cadence();
        index
    }

    pub fn previous(&mut self) -> SlideIndex {
        let index = self.navigate(self.offset(-1), NavigationCause::Previous);
        self.restart_cadence();
        index
    }

    pub fn jump_to(&mut self, index: SlideIndex) -> SlideIndex {
        let target = isize::try_from(index).unwrap_or(isize::MAX);
        let index = self.navigate(target, NavigationCause::Jump);
        self.restart_cadence();
        index
    }

    /// Autoplay beat: advance one slide, leaving the cadence alone.
    pub fn on_tick(&mut self) -> SlideIndex {
        self.navigate(self.offset(1), NavigationCause::Autoplay)
    }

    /// Stop autoplay. Pausing a paused carousel does nothing.
    pub fn pause(&mut self) {
        if self.torn_down {
            return;
        }
        if let Some(handle) = self.clock.stop() {
            emit(
                self.logger.as_ref(),
                LogLevel::Debug,
                CAROUSEL_TARGET,
                "autoplay_paused",
                [json_kv("timer", json!(format!("{handle:?}")))],
            );
        }
    }

    /// Restart autoplay. Resuming a playing carousel does nothing.
    pub fn resume(&mut self) {
        if self.torn_down || self.clock.is_running() {
            return;
        }
        let handle = self.clock.start(self.interval);
        emit(
            self.logger.as_ref(),
            LogLevel::Debug,
            CAROUSEL_TARGET,
            "autoplay_resumed",
            [json_kv("timer", json!(format!("{handle:?}")))],
        );
    }

    pub fn apply(&mut self, command: CarouselCommand) {
        match command {
            CarouselCommand::Previous => {
                self.previous();
            }
            CarouselCommand::Next => {
                self.next();
            }
            CarouselCommand::JumpTo(index) => {
                self.jump_to(index);
            }
            CarouselCommand::Pause => self.pause(),
            CarouselCommand::Resume => self.resume(),
        }
    }

    /// Feed elapsed time: finish any fade pulse, then run one autoplay step
    /// per beat that became due. Returns the number of beats.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.torn_down {
            return 0;
        }
        if let Err(err) = self.renderer.advance(elapsed) {
            self.log_render_failure(&err);
        }
        let beats = self.clock.advance(elapsed);
        for _ in 0..beats {
            self.on_tick();
        }
        beats
    }

    /// Cancel the clock. The carousel ignores every later call.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.clock.stop();
        self.torn_down = true;
        emit(
            self.logger.as_ref(),
            LogLevel::Info,
            CAROUSEL_TARGET,
            "carousel_torn_down",
            [json_kv("index", json!(self.current))],
        );
    }

    pub fn state(&self) -> CarouselState {
        CarouselState {
            current_index: self.current,
            is_playing: self.clock.is_running(),
            pending_timer: self.clock.handle(),
        }
    }

    pub fn current_index(&self) -> SlideIndex {
        self.current
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_running()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn slide_count(&self) -> usize {
        self.registry.len()
    }

    pub fn registry(&self) -> &SlideRegistry {
        &self.registry
    }

    pub fn clock(&self) -> &RotationClock {
        &self.clock
    }

    pub fn surface(&self) -> &S {
        self.renderer.surface()
    }

    /// Slide changes since the previous call, for metrics.
    pub fn take_slide_changes(&mut self) -> u64 {
        std::mem::take(&mut self.unreported_changes)
    }

    fn offset(&self, delta: isize) -> isize {
        self.current as isize + delta
    }

    fn navigate(&mut self, target: isize, cause: NavigationCause) -> SlideIndex {
        if self.torn_down {
            return self.current;
        }
        let count = self.registry.len() as isize;
        let index = (if target >= count {
            0
        } else if target < 0 {
            count - 1
        } else {
            target
        }) as SlideIndex;

        let previous = self.current;
        self.current = index;
        if let Err(err) = self.renderer.render(Some(previous), index) {
            self.log_render_failure(&err);
        }
        self.unreported_changes += 1;

        emit(
            self.logger.as_ref(),
            LogLevel::Debug,
            CAROUSEL_TARGET,
            "slide_changed",
            [
                json_kv("from", json!(previous)),
                json_kv("to", json!(index)),
                json_kv("cause", cause.as_str()),
                json_kv("manual", json!(cause.is_manual())),
            ],
        );
        index
    }

    /// Manual navigation measures the next beat from now, paused or not.
    fn restart_cadence(&mut self) {
        if !self.torn_down {
            self.clock.reset(self.interval);
        }
    }

    fn log_render_failure(&self, err: &crate::error::WidgetError) {
        emit(
            self.logger.as_ref(),
            LogLevel::Warn,
            CAROUSEL_TARGET,
            "render_failed",
            [json_kv("error", err.to_string())],
        );
    }
}
