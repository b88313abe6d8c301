use crate::error::{Result, WidgetError};

/// Stable identity of a slide: its position in the registry.
pub type SlideIndex = usize;

/// One unit of carousel content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub label: String,
    pub content: String,
}

impl Slide {
    pub fn new(label: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            content: content.into(),
        }
    }
}

/// Selectable marker mirroring one slide's active status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    /// Accessible label announced for the marker.
    pub label: String,
}

impl Indicator {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn for_slide(index: SlideIndex) -> Self {
        Self::new(format!("Go to slide {}", index + 1))
    }
}

/// Immutable ordered list of slides and their indicators.
#[derive(Debug, Clone)]
pub struct SlideRegistry {
    slides: Vec<Slide>,
    indicators: Vec<Indicator>,
}

impl SlideRegistry {
    /// Register slides with one indicator each. Empty or mismatched input is
    /// rejected so no state machine is ever built over zero elements.
    pub fn register(slides: Vec<Slide>, indicators: Vec<Indicator>) -> Result<Self> {
        if slides.is_empty() {
            return Err(WidgetError::EmptyRegistry);
        }
        if slides.len() != indicators.len() {
            return Err(WidgetError::IndicatorMismatch {
                slides: slides.len(),
                indicators: indicators.len(),
            });
        }
        Ok(Self { slides, indicators })
    }

    pub fn with_default_indicators(slides: Vec<Slide>) -> Result<Self> {
        let indicators = (0..slides.len()).map(Indicator::for_slide).collect();
        Self::register(slides, indicators)
    }

    /// Slide count; always at least one.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slide(&self, index: SlideIndex) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn indicator(&self, index: SlideIndex) -> Option<&Indicator> {
        self.indicators.get(index)
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }
}
