//! Rendering-independent pointer input.
//!
//! The UI layer translates its native mouse events into these, with
//! positions already made relative to the canvas container.

use crate::models::ScreenPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press {
        button: PointerButton,
        position: ScreenPoint,
    },
    Move {
        position: ScreenPoint,
    },
    Release {
        button: PointerButton,
        position: ScreenPoint,
    },
    /// Pointer left the canvas bounds.
    Leave,
    /// `delta_y` uses the DOM sign convention (negative = scroll up).
    Wheel {
        position: ScreenPoint,
        delta_y: f64,
    },
    /// Secondary action (right click / context menu).
    ContextTrigger {
        position: ScreenPoint,
    },
}

impl PointerEvent {
    pub fn press(x: f64, y: f64) -> Self {
        PointerEvent::Press {
            button: PointerButton::Primary,
            position: ScreenPoint::new(x, y),
        }
    }

    pub fn move_to(x: f64, y: f64) -> Self {
        PointerEvent::Move {
            position: ScreenPoint::new(x, y),
        }
    }

    pub fn release(x: f64, y: f64) -> Self {
        PointerEvent::Release {
            button: PointerButton::Primary,
            position: ScreenPoint::new(x, y),
        }
    }

    pub fn wheel(x: f64, y: f64, delta_y: f64) -> Self {
        PointerEvent::Wheel {
            position: ScreenPoint::new(x, y),
            delta_y,
        }
    }

    pub fn context(x: f64, y: f64) -> Self {
        PointerEvent::ContextTrigger {
            position: ScreenPoint::new(x, y),
        }
    }
}
