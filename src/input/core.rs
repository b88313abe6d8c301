use crossterm::event::{KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use serde::Deserialize;

use crate::event::{Control, PageEvent, Region};
use crate::geometry::Rect;
use crate::registry::SlideIndex;

/// Operations the carousel exposes to its input sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselCommand {
    Previous,
    Next,
    JumpTo(SlideIndex),
    Pause,
    Resume,
}

/// Where arrow keys are accepted from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyScope {
    /// Any arrow key press on the page drives the carousel.
    #[default]
    Global,
    /// Arrow keys only count while the pointer is over the carousel.
    Hovered,
}

/// Clickable cells for the carousel controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlHitAreas {
    pub previous: Option<Rect>,
    pub next: Option<Rect>,
    pub indicators: Vec<Rect>,
}

impl ControlHitAreas {
    /// Bottom-row control strip: `‹` at the left edge, `›` at the right edge,
    /// indicator dots centered between them two cells apart.
    pub fn strip(region: Rect, slide_count: usize) -> Self {
        if region.height == 0 || region.width < 3 {
            return Self::default();
        }
        let row = region.bottom() - 1;
        let previous = Some(Rect::new(region.x, row, 1, 1));
        let next = Some(Rect::new(region.right() - 1, row, 1, 1));

        let dots_width = (slide_count * 2).saturating_sub(1);
        let indicators = if slide_count > 0 && dots_width + 4 <= region.width as usize {
            let start = region.x as usize + (region.width as usize - dots_width) / 2;
            (0..slide_count)
                .map(|index| Rect::new((start + index * 2) as u16, row, 1, 1))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            previous,
            next,
            indicators,
        }
    }

    pub fn hit(&self, column: u16, row: u16) -> Option<CarouselCommand> {
        let inside = |rect: &Option<Rect>| rect.is_some_and(|rect| rect.contains(column, row));
        if inside(&self.previous) {
            return Some(CarouselCommand::Previous);
        }
        if inside(&self.next) {
            return Some(CarouselCommand::Next);
        }
        self.indicators
            .iter()
            .position(|rect| rect.contains(column, row))
            .map(CarouselCommand::JumpTo)
    }
}

/// Binds hover, keyboard and control activation to carousel commands.
#[derive(Debug, Clone)]
pub struct InputRouter {
    region: Rect,
    controls: ControlHitAreas,
    key_scope: KeyScope,
    pointer_inside: bool,
}

impl InputRouter {
    pub fn new(region: Rect, controls: ControlHitAreas, key_scope: KeyScope) -> Self {
        Self {
            region,
            controls,
            key_scope,
            pointer_inside: false,
        }
    }

    pub fn pointer_inside(&self) -> bool {
        self.pointer_inside
    }

    pub fn key_scope(&self) -> KeyScope {
        self.key_scope
    }

    pub fn route(&mut self, event: &PageEvent) -> Option<CarouselCommand> {
        match event {
            PageEvent::Activate(control) => route_control(*control),
            PageEvent::PointerEntered(Region::Carousel) => {
                self.pointer_inside = true;
                Some(CarouselCommand::Pause)
            }
            PageEvent::PointerLeft(Region::Carousel) => {
                self.pointer_inside = false;
                Some(CarouselCommand::Resume)
            }
            PageEvent::Key(key) => {
                if key.kind == KeyEventKind::Release {
                    return None;
                }
                if self.key_scope == KeyScope::Hovered && !self.pointer_inside {
                    return None;
                }
                match key.code {
                    KeyCode::Left => Some(CarouselCommand::Previous),
                    KeyCode::Right => Some(CarouselCommand::Next),
                    _ => None,
                }
            }
            PageEvent::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                    self.track_pointer(mouse.column, mouse.row)
                }
                MouseEventKind::Down(MouseButton::Left) => {
                    self.controls.hit(mouse.column, mouse.row)
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// Derive enter/leave transitions from raw pointer motion.
    fn track_pointer(&mut self, column: u16, row: u16) -> Option<CarouselCommand> {
        let inside = self.region.contains(column, row);
        if inside == self.pointer_inside {
            return None;
        }
        self.pointer_inside = inside;
        Some(if inside {
            CarouselCommand::Pause
        } else {
            CarouselCommand::Resume
        })
    }
}

fn route_control(control: Control) -> Option<CarouselCommand> {
    match control {
        Control::CarouselPrevious => Some(CarouselCommand::Previous),
        Control::CarouselNext => Some(CarouselCommand::Next),
        Control::CarouselIndicator(index) => Some(CarouselCommand::JumpTo(index)),
        _ => None,
    }
}
