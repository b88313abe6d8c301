use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{Result, WidgetError};
use crate::event::{Control, EventFlow, PageEvent};
use crate::logging::{LogLevel, Logger, WIDGETS_TARGET, emit, json_kv};
use crate::store::SharedStore;

use super::{PageContext, PageWidget};

/// Preference key under which the display mode is persisted.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Light,
    Dark,
}

impl DisplayMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Light => "light",
            DisplayMode::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(DisplayMode::Light),
            "dark" => Some(DisplayMode::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Light => DisplayMode::Dark,
            DisplayMode::Dark => DisplayMode::Light,
        }
    }

    /// Glyph shown on the toggle: the mode a press switches to.
    pub fn icon(self) -> &'static str {
        match self {
            DisplayMode::Light => "☾",
            DisplayMode::Dark => "☀",
        }
    }
}

/// Process-wide display attribute; clones observe the same value.
#[derive(Debug, Clone, Default)]
pub struct DisplayAttribute {
    inner: Arc<RwLock<DisplayMode>>,
}

impl DisplayAttribute {
    pub fn new(mode: DisplayMode) -> Self {
        Self {
            inner: Arc::new(RwLock::new(mode)),
        }
    }

    pub fn get(&self) -> DisplayMode {
        self.inner.read().map(|guard| *guard).unwrap_or_default()
    }

    pub fn set(&self, mode: DisplayMode) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = mode;
        }
    }
}

/// Structural elements of the toggle control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeToggleMarkup {
    pub label: String,
}

/// Light/dark switch persisted through a [`PreferenceStore`](crate::store::PreferenceStore).
pub struct ThemeToggle {
    store: SharedStore,
    key: String,
    attribute: DisplayAttribute,
    icon: &'static str,
    logger: Option<Logger>,
}

impl std::fmt::Debug for ThemeToggle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeToggle")
            .field("key", &self.key)
            .field("mode", &self.attribute.get())
            .field("icon", &self.icon)
            .finish_non_exhaustive()
    }
}

impl ThemeToggle {
    /// Read the stored preference and reflect it onto the attribute and icon.
    pub fn mount(
        markup: Option<&ThemeToggleMarkup>,
        store: SharedStore,
        key: impl Into<String>,
        attribute: DisplayAttribute,
        logger: Option<Logger>,
    ) -> Result<Self> {
        markup.ok_or(WidgetError::MissingElement("theme-toggle"))?;
        let key = key.into();

        let mode = match store.get(&key) {
            Ok(Some(value)) => DisplayMode::parse(&value).unwrap_or_default(),
            Ok(None) => DisplayMode::default(),
            Err(err) => {
                emit(
                    logger.as_ref(),
                    LogLevel::Warn,
                    WIDGETS_TARGET,
                    "theme_read_failed",
                    [json_kv("error", err.to_string())],
                );
                DisplayMode::default()
            }
        };
        attribute.set(mode);

        Ok(Self {
            store,
            key,
            attribute,
            icon: mode.icon(),
            logger,
        })
    }

    pub fn mode(&self) -> DisplayMode {
        self.attribute.get()
    }

    pub fn icon(&self) -> &'static str {
        self.icon
    }

    /// Flip the mode and persist it. A failed write keeps the new mode on screen.
    pub fn toggle(&mut self) -> DisplayMode {
        let mode = self.attribute.get().toggled();
        self.attribute.set(mode);
        self.icon = mode.icon();

        if let Err(err) = self.store.set(&self.key, mode.as_str()) {
            emit(
                self.logger.as_ref(),
                LogLevel::Warn,
                WIDGETS_TARGET,
                "theme_persist_failed",
                [json_kv("error", err.to_string())],
            );
        }
        emit(
            self.logger.as_ref(),
            LogLevel::Debug,
            WIDGETS_TARGET,
            "theme_toggled",
            [json_kv("mode", json!(mode.as_str()))],
        );
        mode
    }
}

impl PageWidget for ThemeToggle {
    fn name(&self) -> &str {
        "theme_toggle"
    }

    fn on_event(&mut self, _ctx: &mut PageContext, event: &PageEvent) -> Result<EventFlow> {
        if matches!(event, PageEvent::Activate(Control::ThemeToggle)) {
            self.toggle();
            return Ok(EventFlow::Consumed);
        }
        Ok(EventFlow::Continue)
    }
}
