use std::time::Duration;

use crate::error::Result;
use crate::registry::SlideIndex;

/// Length of the transparency pulse that masks a slide swap.
pub const DEFAULT_FADE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opacity {
    Opaque,
    Transparent,
}

/// Display target for carousel activation state.
///
/// Setters only record the desired state; `flush` makes it visible.
pub trait SlideSurface {
    fn set_slide_active(&mut self, index: SlideIndex, active: bool);
    fn set_indicator_active(&mut self, index: SlideIndex, active: bool);
    fn set_opacity(&mut self, opacity: Opacity);

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: SlideSurface + ?Sized> SlideSurface for Box<S> {
    fn set_slide_active(&mut self, index: SlideIndex, active: bool) {
        (**self).set_slide_active(index, active);
    }

    fn set_indicator_active(&mut self, index: SlideIndex, active: bool) {
        (**self).set_indicator_active(index, active);
    }

    fn set_opacity(&mut self, opacity: Opacity) {
        (**self).set_opacity(opacity);
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// Applies slide hand-offs to a surface. The only state kept between calls is
/// the remaining time of the current fade pulse.
pub struct TransitionRenderer<S> {
    surface: S,
    slide_count: usize,
    fade: Duration,
    pulse_remaining: Option<Duration>,
}

impl<S: SlideSurface> TransitionRenderer<S> {
    pub fn new(surface: S, slide_count: usize, fade: Duration) -> Self {
        Self {
            surface,
            slide_count,
            fade,
            pulse_remaining: None,
        }
    }

    /// Swap the active slide and indicator pair from `from` to `to` in one step.
    /// With no previous index every other pair is cleared and no pulse runs.
    pub fn render(&mut self, from: Option<SlideIndex>, to: SlideIndex) -> Result<()> {
        if from.is_some() && !self.fade.is_zero() {
            self.surface.set_opacity(Opacity::Transparent);
            self.pulse_remaining = Some(self.fade);
        } else {
            self.surface.set_opacity(Opacity::Opaque);
            self.pulse_remaining = None;
        }

        match from {
            Some(previous) if previous != to => self.deactivate(previous),
            Some(_) => {}
            None => {
                for index in (0..self.slide_count).filter(|index| *index != to) {
                    self.deactivate(index);
                }
            }
        }
        self.surface.set_slide_active(to, true);
        self.surface.set_indicator_active(to, true);
        self.surface.flush()
    }

    /// Progress the fade pulse, restoring full opacity once it has elapsed.
    pub fn advance(&mut self, elapsed: Duration) -> Result<()> {
        let Some(remaining) = self.pulse_remaining else {
            return Ok(());
        };
        if elapsed >= remaining {
            self.pulse_remaining = None;
            self.surface.set_opacity(Opacity::Opaque);
            self.surface.flush()
        } else {
            self.pulse_remaining = Some(remaining - elapsed);
            Ok(())
        }
    }

    pub fn is_fading(&self) -> bool {
        self.pulse_remaining.is_some()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn deactivate(&mut self, index: SlideIndex) {
        self.surface.set_slide_active(index, false);
        self.surface.set_indicator_active(index, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MemorySurface;

    #[test]
    fn initial_render_leaves_one_active_pair() {
        let surface = MemorySurface::new(4);
        let mut renderer = TransitionRenderer::new(surface.clone(), 4, DEFAULT_FADE);
        renderer.render(None, 2).unwrap();

        let snapshot = surface.snapshot();
        assert_eq!(snapshot.active_slides(), vec![2]);
        assert_eq!(snapshot.active_indicators(), vec![2]);
    }

    #[test]
    fn pulse_restores_opacity_after_fade() {
        let surface = MemorySurface::new(3);
        let mut renderer = TransitionRenderer::new(surface.clone(), 3, DEFAULT_FADE);
        renderer.render(None, 0).unwrap();
        assert_eq!(surface.snapshot().opacity, Opacity::Opaque);
        renderer.render(Some(0), 1).unwrap();
        assert_eq!(surface.snapshot().opacity, Opacity::Transparent);

        renderer.advance(Duration::from_millis(200)).unwrap();
        assert!(renderer.is_fading());
        renderer.advance(Duration::from_millis(100)).unwrap();
        assert!(!renderer.is_fading());
        assert_eq!(surface.snapshot().opacity, Opacity::Opaque);
    }

    #[test]
    fn rapid_renders_supersede_each_other() {
        let surface = MemorySurface::new(5);
        let mut renderer = TransitionRenderer::new(surface.clone(), 5, DEFAULT_FADE);
        renderer.render(None, 0).unwrap();
        renderer.render(Some(0), 1).unwrap();
        renderer.advance(Duration::from_millis(250)).unwrap();
        renderer.render(Some(1), 2).unwrap();

        // The second pulse restarted the fade window.
        renderer.advance(Duration::from_millis(250)).unwrap();
        assert!(renderer.is_fading());

        let snapshot = surface.snapshot();
        assert_eq!(snapshot.active_slides(), vec![2]);
        assert_eq!(snapshot.active_indicators(), vec![2]);
        assert_eq!(snapshot.pulses, 2);
    }

    #[test]
    fn zero_fade_renders_opaque() {
        let surface = MemorySurface::new(2);
        let mut renderer = TransitionRenderer::new(surface.clone(), 2, Duration::ZERO);
        renderer.render(None, 1).unwrap();
        renderer.render(Some(1), 0).unwrap();
        assert!(!renderer.is_fading());
        assert_eq!(surface.snapshot().opacity, Opacity::Opaque);
    }
}
