use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::registry::SlideIndex;

use super::core::{Opacity, SlideSurface};

/// Point-in-time copy of what a [`MemorySurface`] displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceSnapshot {
    pub slides: Vec<bool>,
    pub indicators: Vec<bool>,
    pub opacity: Opacity,
    /// Number of transparency pulses started so far.
    pub pulses: u32,
    pub flushes: u32,
}

impl SurfaceSnapshot {
    pub fn active_slides(&self) -> Vec<SlideIndex> {
        active_positions(&self.slides)
    }

    pub fn active_indicators(&self) -> Vec<SlideIndex> {
        active_positions(&self.indicators)
    }
}

fn active_positions(flags: &[bool]) -> Vec<SlideIndex> {
    flags
        .iter()
        .enumerate()
        .filter_map(|(index, active)| active.then_some(index))
        .collect()
}

/// Headless surface. Clones share state, so a caller can hand one clone to
/// the carousel and inspect another.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    inner: Arc<Mutex<SurfaceSnapshot>>,
}

impl MemorySurface {
    pub fn new(slide_count: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SurfaceSnapshot {
                slides: vec![false; slide_count],
                indicators: vec![false; slide_count],
                opacity: Opacity::Opaque,
                pulses: 0,
                flushes: 0,
            })),
        }
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        match self.inner.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut SurfaceSnapshot)) {
        if let Ok(mut guard) = self.inner.lock() {
            apply(&mut guard);
        }
    }
}

impl SlideSurface for MemorySurface {
    fn set_slide_active(&mut self, index: SlideIndex, active: bool) {
        self.update(|state| {
            if let Some(flag) = state.slides.get_mut(index) {
                *flag = active;
            }
        });
    }

    fn set_indicator_active(&mut self, index: SlideIndex, active: bool) {
        self.update(|state| {
            if let Some(flag) = state.indicators.get_mut(index) {
                *flag = active;
            }
        });
    }

    fn set_opacity(&mut self, opacity: Opacity) {
        self.update(|state| {
            if opacity == Opacity::Transparent {
                state.pulses += 1;
            }
            state.opacity = opacity;
        });
    }

    fn flush(&mut self) -> Result<()> {
        self.update(|state| state.flushes += 1);
        Ok(())
    }
}
