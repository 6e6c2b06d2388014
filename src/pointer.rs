// OS mouse injection. Every call is fire-and-forget: a refused move or click
// (e.g. a platform safety interlock) is logged and dropped, never returned.

use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use log::debug;

use crate::debounce::MouseButton;
use crate::error::Error;
use crate::types::Point;

pub trait PointerSink {
    fn move_cursor(&mut self, to: Point);
    fn click(&mut self, button: MouseButton);
}

pub struct EnigoPointer {
    enigo: Enigo,
}

impl EnigoPointer {
    pub fn new() -> Result<Self, Error> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| Error::Pointer(format!("Connect to input system: {e:?}")))?;
        Ok(Self { enigo })
    }

    /// Size of the main display in pixels.
    pub fn screen_size(&self) -> Result<(u32, u32), Error> {
        let (w, h) = self
            .enigo
            .main_display()
            .map_err(|e| Error::Pointer(format!("Query display size: {e:?}")))?;
        Ok((w.max(1) as u32, h.max(1) as u32))
    }
}

impl PointerSink for EnigoPointer {
    fn move_cursor(&mut self, to: Point) {
        if let Err(e) = self.enigo.move_mouse(to.x, to.y, Coordinate::Abs) {
            debug!("Cursor move to ({}, {}) dropped: {e:?}", to.x, to.y);
        }
    }

    fn click(&mut self, button: MouseButton) {
        let b = match button {
            MouseButton::Left => Button::Left,
            MouseButton::Right => Button::Right,
        };
        if let Err(e) = self.enigo.button(b, Direction::Click) {
            debug!("{button:?} click dropped: {e:?}");
        }
    }
}
