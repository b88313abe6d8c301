//! Page configuration, loadable from JSON.
//!
//! Every field has a default, so `{}` is a valid configuration file.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::clock::DEFAULT_INTERVAL;
use crate::error::{Result, WidgetError};
use crate::input::KeyScope;
use crate::render::DEFAULT_FADE;
use crate::widgets::theme::THEME_KEY;

/// Longest autoplay cadence accepted from configuration: one day.
pub const MAX_INTERVAL_MS: u64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    /// Autoplay cadence.
    pub interval_ms: u64,
    /// Transparency pulse masking each slide swap; zero disables it.
    pub fade_ms: u64,
    pub key_scope: KeyScope,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL.as_millis() as u64,
            fade_ms: DEFAULT_FADE.as_millis() as u64,
            key_scope: KeyScope::Global,
        }
    }
}

impl CarouselConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub storage_key: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: THEME_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    pub carousel: CarouselConfig,
    pub theme: ThemeConfig,
    /// Interval between synthetic tick events in the live runtime.
    pub tick_interval_ms: u64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            carousel: CarouselConfig::default(),
            theme: ThemeConfig::default(),
            tick_interval_ms: 100,
        }
    }
}

impl PageConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.carousel.interval_ms == 0 {
            return Err(WidgetError::InvalidConfig(
                "carousel.interval_ms must be positive".to_string(),
            ));
        }
        if self.carousel.interval_ms > MAX_INTERVAL_MS {
            return Err(WidgetError::InvalidConfig(format!(
                "carousel.interval_ms must be at most {MAX_INTERVAL_MS}"
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(WidgetError::InvalidConfig(
                "tick_interval_ms must be positive".to_string(),
            ));
        }
        if self.theme.storage_key.trim().is_empty() {
            return Err(WidgetError::InvalidConfig(
                "theme.storage_key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
