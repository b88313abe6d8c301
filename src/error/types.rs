use thiserror::Error;

/// Unified result type for the showcase crate.
pub type Result<T> = std::result::Result<T, WidgetError>;

/// Errors surfaced by the page widgets and their host runtime.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("required element `{0}` is missing")]
    MissingElement(&'static str),
    #[error("carousel has no slides")]
    EmptyRegistry,
    #[error("{slides} slides registered with {indicators} indicators")]
    IndicatorMismatch { slides: usize, indicators: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("preference store failure: {0}")]
    Store(String),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl WidgetError {
    /// Conditions that mean "this widget is not on the page" rather than a fault.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            WidgetError::MissingElement(_)
                | WidgetError::EmptyRegistry
                | WidgetError::IndicatorMismatch { .. }
        )
    }
}
