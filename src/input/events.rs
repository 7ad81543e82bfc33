//! Host event payloads and the value types derived from them

use serde::{Deserialize, Serialize};

/// Host channels an [`InputState`](super::InputState) listens on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    PointerMove,
    PointerDown,
    PointerUp,
    KeyDown,
    KeyUp,
}

impl Channel {
    /// Returns true for the three surface-scoped pointer channels
    pub fn is_pointer(self) -> bool {
        matches!(self, Self::PointerMove | Self::PointerDown | Self::PointerUp)
    }

    /// Returns true for the two global keyboard channels
    pub fn is_keyboard(self) -> bool {
        !self.is_pointer()
    }
}

/// Pointer event as delivered by the host
///
/// Coordinates are client-relative (top-left of the host viewport), the button
/// code follows DOM `MouseEvent.button` numbering.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub client_x: f64,
    pub client_y: f64,
    pub button: i16,
}

impl PointerEvent {
    /// A move sample at client coordinates
    pub fn moved(client_x: f64, client_y: f64) -> Self {
        Self {
            client_x,
            client_y,
            button: 0,
        }
    }

    /// A button transition carrying only the native button code
    pub fn button(code: i16) -> Self {
        Self {
            button: code,
            ..Self::default()
        }
    }
}

/// Keyboard event as delivered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardEvent {
    /// DOM-style key identifier ("a", "A", " ", "ArrowUp", ...)
    pub key: String,
}

impl KeyboardEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Any event the host can dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Pointer(PointerEvent),
    Key(KeyboardEvent),
}

/// Pointer button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MouseButton {
    Left = 0,
    Middle = 1,
    Right = 2,
}

impl MouseButton {
    pub const ALL: [MouseButton; 3] = [Self::Left, Self::Middle, Self::Right];

    /// Map a native button code, `None` outside {0, 1, 2}
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Left),
            1 => Some(Self::Middle),
            2 => Some(Self::Right),
            _ => None,
        }
    }

    /// Native button code
    pub fn code(self) -> i16 {
        self as i16
    }
}

/// Pointer position relative to the tracked surface's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_codes_follow_dom_numbering() {
        for button in MouseButton::ALL {
            assert_eq!(MouseButton::from_code(button.code()), Some(button));
        }
        assert_eq!(MouseButton::Middle.code(), 1);
        assert_eq!(MouseButton::from_code(3), None);
        assert_eq!(MouseButton::from_code(-1), None);
    }

    #[test]
    fn channels_split_by_scope() {
        assert!(Channel::PointerMove.is_pointer());
        assert!(Channel::PointerUp.is_pointer());
        assert!(Channel::KeyDown.is_keyboard());
        assert!(!Channel::KeyUp.is_pointer());
    }
}
