use std::io::Write;

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};

use crate::error::Result;
use crate::geometry::Rect;
use crate::input::ControlHitAreas;
use crate::registry::{SlideIndex, SlideRegistry};
use crate::widgets::{DisplayAttribute, DisplayMode};
use crate::{display_width, truncate_display};

use super::core::{Opacity, SlideSurface};

const ACTIVE_DOT: char = '●';
const INACTIVE_DOT: char = '○';
const PREVIOUS_GLYPH: char = '‹';
const NEXT_GLYPH: char = '›';

/// Terminal surface drawing the active slide inside the carousel track.
///
/// Layout: slide label on the first row, wrapped content below it, and the
/// control strip (`‹ ● ○ ○ ›`) on the last row. Frames are fingerprinted so an
/// unchanged frame is never written twice.
pub struct AnsiSurface<W: Write> {
    writer: W,
    region: Rect,
    slides: Vec<(String, String)>,
    active_slides: Vec<bool>,
    active_indicators: Vec<bool>,
    opacity: Opacity,
    display: Option<DisplayAttribute>,
    last_frame: Option<blake3::Hash>,
}

impl<W: Write> AnsiSurface<W> {
    pub fn new(writer: W, region: Rect, registry: &SlideRegistry) -> Self {
        let slides = registry
            .slides()
            .iter()
            .map(|slide| (slide.label.clone(), slide.content.clone()))
            .collect();
        Self {
            writer,
            region,
            slides,
            active_slides: vec![false; registry.len()],
            active_indicators: vec![false; registry.len()],
            opacity: Opacity::Opaque,
            display: None,
            last_frame: None,
        }
    }

    /// Follow the page display mode when choosing colors.
    pub fn with_display(mut self, display: DisplayAttribute) -> Self {
        self.display = Some(display);
        self
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn mode(&self) -> DisplayMode {
        self.display
            .as_ref()
            .map(DisplayAttribute::get)
            .unwrap_or_default()
    }

    /// Lines for the whole track, each padded to the track width.
    fn compose(&self) -> Vec<String> {
        let Rect { width, height, .. } = self.region;
        if self.region.is_empty() {
            return Vec::new();
        }
        let width = width as usize;
        let height = height as usize;

        let mut lines = Vec::with_capacity(height);
        let active = self.active_slides.iter().position(|active| *active);
        if let (Opacity::Opaque, Some(index)) = (self.opacity, active) {
            let (label, content) = &self.slides[index];
            let body_rows = height.saturating_sub(1);
            if body_rows > 0 {
                lines.push(truncate_display(label, width));
                lines.extend(
                    wrap_words(content, width)
                        .into_iter()
                        .take(body_rows.saturating_sub(1)),
                );
            }
            lines.truncate(body_rows);
            while lines.len() < body_rows {
                lines.push(String::new());
            }
            lines.push(self.control_strip());
        }

        while lines.len() < height {
            lines.push(String::new());
        }
        for line in lines.iter_mut() {
            pad_line(line, width);
        }
        lines
    }

    fn control_strip(&self) -> String {
        let mut cells = vec![' '; self.region.width as usize];
        let areas = ControlHitAreas::strip(self.region, self.active_indicators.len());
        let mut place = |rect: Option<Rect>, glyph: char| {
            if let Some(rect) = rect {
                if let Some(cell) = cells.get_mut((rect.x - self.region.x) as usize) {
                    *cell = glyph;
                }
            }
        };
        place(areas.previous, PREVIOUS_GLYPH);
        place(areas.next, NEXT_GLYPH);
        for (index, rect) in areas.indicators.iter().enumerate() {
            let glyph = if self.active_indicators[index] {
                ACTIVE_DOT
            } else {
                INACTIVE_DOT
            };
            place(Some(*rect), glyph);
        }
        cells.into_iter().collect()
    }

    fn fingerprint(lines: &[String], mode: DisplayMode) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(mode.as_str().as_bytes());
        for line in lines {
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }
        hasher.finalize()
    }
}

impl<W: Write> SlideSurface for AnsiSurface<W> {
    fn set_slide_active(&mut self, index: SlideIndex, active: bool) {
        if let Some(flag) = self.active_slides.get_mut(index) {
            *flag = active;
        }
    }

    fn set_indicator_active(&mut self, index: SlideIndex, active: bool) {
        if let Some(flag) = self.active_indicators.get_mut(index) {
            *flag = active;
        }
    }

    fn set_opacity(&mut self, opacity: Opacity) {
        self.opacity = opacity;
    }

    fn flush(&mut self) -> Result<()> {
        let lines = self.compose();
        let mode = self.mode();
        let fingerprint = Self::fingerprint(&lines, mode);
        if self.last_frame == Some(fingerprint) {
            return Ok(());
        }

        let (foreground, background) = match mode {
            DisplayMode::Light => (Color::Black, Color::White),
            DisplayMode::Dark => (Color::White, Color::Black),
        };
        queue!(
            self.writer,
            SetForegroundColor(foreground),
            SetBackgroundColor(background)
        )?;
        for (offset, line) in lines.iter().enumerate() {
            queue!(
                self.writer,
                MoveTo(self.region.x, self.region.y + offset as u16),
                Print(line)
            )?;
        }
        queue!(self.writer, ResetColor)?;
        self.writer.flush()?;
        self.last_frame = Some(fingerprint);
        Ok(())
    }
}

/// Greedy word wrap; words wider than the line are truncated.
fn wrap_words(content: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if width == 0 {
        return lines;
    }
    for paragraph in content.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let word = truncate_display(word, width);
            let needed = if current.is_empty() {
                display_width(&word)
            } else {
                display_width(&current) + 1 + display_width(&word)
            };
            if needed > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }
    lines
}

fn pad_line(line: &mut String, width: usize) {
    if display_width(line) > width {
        *line = truncate_display(line, width);
    }
    let display = display_width(line);
    line.extend(std::iter::repeat_n(' ', width.saturating_sub(display)));
}
