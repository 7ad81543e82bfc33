//! Raw input collection from winit events

use tracing::trace;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};

use super::events::{Channel, KeyboardEvent, PointerEvent};
use super::host::{EventHub, SurfaceId};

/// Forwards winit window events to an [`EventHub`]
///
/// Pointer events go to one surface, keyboard events to the global channels.
/// Cursor positions are divided by the scale factor, so the hub sees logical
/// client coordinates.
pub struct InputCollector {
    hub: EventHub,
    surface: SurfaceId,
    scale_factor: f64,
}

impl InputCollector {
    /// Creates a new input collector feeding `surface` on `hub`
    pub fn new(hub: &EventHub, surface: SurfaceId) -> Self {
        Self {
            hub: hub.clone(),
            surface,
            scale_factor: 1.0,
        }
    }

    /// Update scale factor (DPI scaling)
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Handle a winit window event
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(position.x, position.y);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse_input(*state, button_code(*button));
            }

            WindowEvent::KeyboardInput { event, .. } => {
                // Repeats arrive as further presses; set insertion makes them no-ops
                self.keyboard_input(event.state, &event.logical_key);
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.set_scale_factor(*scale_factor);
            }

            _ => {}
        }
    }

    /// Forward a cursor position in physical window pixels
    pub fn cursor_moved(&self, physical_x: f64, physical_y: f64) {
        let event = PointerEvent::moved(
            physical_x / self.scale_factor,
            physical_y / self.scale_factor,
        );
        self.hub
            .dispatch_pointer(self.surface, Channel::PointerMove, event);
    }

    /// Forward a button transition with a DOM button code
    pub fn mouse_input(&self, state: ElementState, code: i16) {
        let channel = match state {
            ElementState::Pressed => Channel::PointerDown,
            ElementState::Released => Channel::PointerUp,
        };
        self.hub
            .dispatch_pointer(self.surface, channel, PointerEvent::button(code));
    }

    /// Forward a key transition; keys without a DOM identifier are dropped
    pub fn keyboard_input(&self, state: ElementState, key: &Key) {
        let Some(identifier) = key_identifier(key) else {
            trace!(?key, "key has no identifier");
            return;
        };
        let channel = match state {
            ElementState::Pressed => Channel::KeyDown,
            ElementState::Released => Channel::KeyUp,
        };
        self.hub.dispatch_key(channel, KeyboardEvent::new(identifier));
    }
}

/// DOM `MouseEvent.button` numbering for a winit button
pub fn button_code(button: winit::event::MouseButton) -> i16 {
    use winit::event::MouseButton as WB;
    match button {
        WB::Left => 0,
        WB::Middle => 1,
        WB::Right => 2,
        WB::Back => 3,
        WB::Forward => 4,
        WB::Other(code) => i16::try_from(code).unwrap_or(i16::MAX),
    }
}

/// DOM `KeyboardEvent.key` spelling for a winit logical key
///
/// Characters pass through verbatim, the space bar becomes `" "`, the
/// Windows/Command key becomes `"Meta"`, and other named keys use their name
/// (winit names them after the DOM values).
pub fn key_identifier(key: &Key) -> Option<String> {
    match key {
        Key::Named(NamedKey::Space) => Some(" ".to_string()),
        // winit's Meta is the legacy X11 modifier; Super is the DOM "Meta" key
        Key::Named(NamedKey::Super) => Some("Meta".to_string()),
        Key::Named(named) => Some(format!("{named:?}")),
        Key::Character(text) => Some(text.to_string()),
        Key::Dead(_) => Some("Dead".to_string()),
        Key::Unidentified(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::input::{InputState, MouseButton, PointerPosition, Rect, RectSurface, ValidKeySet};
    use winit::keyboard::{NativeKey, SmolStr};

    fn setup(rect: Rect) -> (InputCollector, InputState) {
        let hub = EventHub::new();
        let surface = hub.add_surface(Rc::new(RectSurface::new(rect)));
        let state = InputState::new(&hub, surface, ValidKeySet::default()).unwrap();
        (InputCollector::new(&hub, surface), state)
    }

    #[test]
    fn key_identifiers_match_dom_spelling() {
        assert_eq!(key_identifier(&Key::Named(NamedKey::Space)).as_deref(), Some(" "));
        assert_eq!(key_identifier(&Key::Named(NamedKey::ArrowUp)).as_deref(), Some("ArrowUp"));
        assert_eq!(key_identifier(&Key::Named(NamedKey::Escape)).as_deref(), Some("Escape"));
        assert_eq!(key_identifier(&Key::Named(NamedKey::Super)).as_deref(), Some("Meta"));
        assert_eq!(
            key_identifier(&Key::Character(SmolStr::new("A"))).as_deref(),
            Some("A")
        );
        assert_eq!(key_identifier(&Key::Unidentified(NativeKey::Unidentified)), None);
    }

    #[test]
    fn modifier_keys_are_recognized_by_default() {
        let keys = ValidKeySet::default();
        for named in [
            NamedKey::Super,
            NamedKey::Meta,
            NamedKey::Control,
            NamedKey::Shift,
            NamedKey::Alt,
            NamedKey::CapsLock,
        ] {
            let identifier = key_identifier(&Key::Named(named)).unwrap();
            assert!(keys.contains(&identifier), "{named:?} -> {identifier:?} not recognized");
        }
    }

    #[test]
    fn command_key_is_tracked_as_meta() {
        let (collector, state) = setup(Rect::default());

        collector.keyboard_input(ElementState::Pressed, &Key::Named(NamedKey::Super));
        assert!(state.is_key_pressed("Meta"));

        collector.keyboard_input(ElementState::Released, &Key::Named(NamedKey::Super));
        assert!(!state.is_key_pressed("Meta"));
    }

    #[test]
    fn button_codes_follow_dom_numbering() {
        use winit::event::MouseButton as WB;
        assert_eq!(button_code(WB::Left), MouseButton::Left.code());
        assert_eq!(button_code(WB::Middle), MouseButton::Middle.code());
        assert_eq!(button_code(WB::Right), MouseButton::Right.code());
        assert_eq!(button_code(WB::Back), 3);
        assert_eq!(button_code(WB::Other(7)), 7);
    }

    #[test]
    fn cursor_positions_are_scaled_to_logical_pixels() {
        let (mut collector, state) = setup(Rect::new(10.0, 20.0, 100.0, 100.0));
        collector.set_scale_factor(2.0);

        collector.cursor_moved(120.0, 160.0);

        assert_eq!(state.pointer_position(), PointerPosition::new(50.0, 60.0));
    }

    #[test]
    fn forwards_buttons_and_keys() {
        let (collector, state) = setup(Rect::default());

        collector.mouse_input(ElementState::Pressed, button_code(winit::event::MouseButton::Right));
        collector.keyboard_input(ElementState::Pressed, &Key::Named(NamedKey::Space));
        collector.keyboard_input(ElementState::Pressed, &Key::Character(SmolStr::new("w")));

        assert!(state.is_pointer_button_pressed(MouseButton::Right));
        assert!(state.is_key_pressed(" "));
        assert!(state.is_key_pressed("w"));

        collector.mouse_input(ElementState::Released, 2);
        collector.keyboard_input(ElementState::Released, &Key::Character(SmolStr::new("w")));

        assert!(!state.is_pointer_button_pressed(MouseButton::Right));
        assert!(!state.is_key_pressed("w"));
        assert!(state.is_key_pressed(" "));
    }
}
