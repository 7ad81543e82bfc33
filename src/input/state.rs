//! Pollable input state
//!
//! [`InputState`] attaches five listeners to an [`EventHub`] (pointer
//! move/down/up on one surface, key down/up globally) and folds the events it
//! receives into a point-in-time snapshot: pressed keys, pressed pointer
//! buttons, and the pointer position relative to the surface.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::events::{Channel, HostEvent, KeyboardEvent, MouseButton, PointerEvent, PointerPosition};
use super::host::{EventHub, Listener, ListenerId, Rect, Surface, SurfaceId, Target};
use super::keys::ValidKeySet;
use crate::config::InputConfig;
use crate::error::InputError;

const CHANNELS: [Channel; 5] = [
    Channel::PointerMove,
    Channel::PointerDown,
    Channel::PointerUp,
    Channel::KeyDown,
    Channel::KeyUp,
];

/// How pointer button codes outside {Left, Middle, Right} are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonPolicy {
    /// Ignore unknown codes
    #[default]
    Strict,
    /// Track any code the host reports as an opaque value
    Permissive,
}

/// Owned copy of everything an [`InputState`] tracks
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct InputSnapshot {
    /// Pressed keys, sorted
    pub keys: Vec<String>,
    /// Pressed buttons from the closed enumeration
    pub buttons: Vec<MouseButton>,
    /// Every pressed button code, sorted; includes unknown codes under
    /// [`ButtonPolicy::Permissive`]
    pub button_codes: Vec<i16>,
    pub position: PointerPosition,
}

/// Mutable state shared between an [`InputState`] and its listeners
#[derive(Debug)]
struct Tracker {
    keys: HashSet<String>,
    buttons: HashSet<i16>,
    position: PointerPosition,
    valid_keys: ValidKeySet,
    policy: ButtonPolicy,
}

impl Tracker {
    fn new(valid_keys: ValidKeySet, policy: ButtonPolicy) -> Self {
        Self {
            keys: HashSet::new(),
            buttons: HashSet::new(),
            position: PointerPosition::default(),
            valid_keys,
            policy,
        }
    }

    fn handle(&mut self, channel: Channel, event: &HostEvent, surface: &dyn Surface) {
        match (channel, event) {
            (Channel::PointerMove, HostEvent::Pointer(e)) => {
                self.on_pointer_move(e, surface.bounding_rect())
            }
            (Channel::PointerDown, HostEvent::Pointer(e)) => self.on_pointer_down(e),
            (Channel::PointerUp, HostEvent::Pointer(e)) => self.on_pointer_up(e),
            (Channel::KeyDown, HostEvent::Key(e)) => self.on_key_down(e),
            (Channel::KeyUp, HostEvent::Key(e)) => self.on_key_up(e),
            (channel, event) => debug!(?channel, ?event, "event does not match its channel"),
        }
    }

    fn on_pointer_move(&mut self, event: &PointerEvent, rect: Rect) {
        // No clamping: positions outside the surface are reported as-is
        self.position = PointerPosition::new(event.client_x - rect.left, event.client_y - rect.top);
        trace!(x = self.position.x, y = self.position.y, "pointer moved");
    }

    fn on_pointer_down(&mut self, event: &PointerEvent) {
        if self.accepts_button(event.button) && self.buttons.insert(event.button) {
            debug!(code = event.button, "pointer button pressed");
        }
    }

    fn on_pointer_up(&mut self, event: &PointerEvent) {
        if self.accepts_button(event.button) && self.buttons.remove(&event.button) {
            debug!(code = event.button, "pointer button released");
        }
    }

    fn accepts_button(&self, code: i16) -> bool {
        match self.policy {
            ButtonPolicy::Permissive => true,
            ButtonPolicy::Strict => {
                let known = MouseButton::from_code(code).is_some();
                if !known {
                    debug!(code, "ignoring unrecognized pointer button");
                }
                known
            }
        }
    }

    fn on_key_down(&mut self, event: &KeyboardEvent) {
        if !self.valid_keys.contains(&event.key) {
            debug!(key = %event.key, "ignoring unrecognized key");
            return;
        }
        if self.keys.insert(event.key.clone()) {
            debug!(key = %event.key, "key pressed");
        }
    }

    fn on_key_up(&mut self, event: &KeyboardEvent) {
        if !self.valid_keys.contains(&event.key) {
            debug!(key = %event.key, "ignoring unrecognized key");
            return;
        }
        if self.keys.remove(&event.key) {
            debug!(key = %event.key, "key released");
        }
    }

    fn snapshot(&self) -> InputSnapshot {
        let mut keys: Vec<String> = self.keys.iter().cloned().collect();
        keys.sort();
        let mut button_codes: Vec<i16> = self.buttons.iter().copied().collect();
        button_codes.sort_unstable();

        InputSnapshot {
            keys,
            buttons: button_codes
                .iter()
                .filter_map(|&code| MouseButton::from_code(code))
                .collect(),
            button_codes,
            position: self.position,
        }
    }
}

/// Pollable snapshot of pressed keys, pressed pointer buttons and pointer
/// position for one surface
///
/// The instance owns its listener handles; [`destroy`](Self::destroy) (or
/// dropping the instance) detaches exactly those listeners. After that the
/// last snapshot stays queryable but no longer changes.
#[derive(Debug)]
pub struct InputState {
    tracker: Rc<RefCell<Tracker>>,
    hub: EventHub,
    surface: SurfaceId,
    listeners: Vec<ListenerId>,
}

impl InputState {
    /// Attach to `surface` with the given key allow-list and the default
    /// (strict) button policy
    pub fn new(hub: &EventHub, surface: SurfaceId, keys: ValidKeySet) -> Result<Self, InputError> {
        Self::with_policy(hub, surface, keys, ButtonPolicy::default())
    }

    /// Attach using a loaded [`InputConfig`]
    pub fn from_config(
        hub: &EventHub,
        surface: SurfaceId,
        config: &InputConfig,
    ) -> Result<Self, InputError> {
        Self::with_policy(hub, surface, config.key_set(), config.button_policy)
    }

    /// Attach with an explicit button policy
    ///
    /// Fails with [`InputError::UnknownSurface`] if the hub does not know
    /// `surface`. Listeners attached before a failure are released again.
    pub fn with_policy(
        hub: &EventHub,
        surface: SurfaceId,
        keys: ValidKeySet,
        policy: ButtonPolicy,
    ) -> Result<Self, InputError> {
        let target = hub
            .surface(surface)
            .ok_or(InputError::UnknownSurface(surface))?;

        let mut state = Self {
            tracker: Rc::new(RefCell::new(Tracker::new(keys, policy))),
            hub: hub.clone(),
            surface,
            listeners: Vec::with_capacity(CHANNELS.len()),
        };

        for channel in CHANNELS {
            let scope = if channel.is_pointer() {
                Target::Surface(surface)
            } else {
                Target::Global
            };
            let listener = Self::listener(channel, Rc::downgrade(&state.tracker), Rc::clone(&target));
            // On error `state` drops here and releases what was attached so far
            let id = hub.subscribe(scope, channel, listener)?;
            state.listeners.push(id);
        }

        info!(%surface, ?policy, "input state attached");
        Ok(state)
    }

    fn listener(channel: Channel, tracker: Weak<RefCell<Tracker>>, surface: Rc<dyn Surface>) -> Listener {
        Rc::new(move |event: &HostEvent| {
            if let Some(tracker) = tracker.upgrade() {
                tracker.borrow_mut().handle(channel, event, surface.as_ref());
            }
        })
    }

    /// Returns true if `key` is currently held
    ///
    /// Identifiers outside the allow-list are never pressed.
    pub fn is_key_pressed(&self, key: &str) -> bool {
        self.tracker.borrow().keys.contains(key)
    }

    pub fn is_pointer_button_pressed(&self, button: MouseButton) -> bool {
        self.is_button_code_pressed(button.code())
    }

    /// Query by native button code
    ///
    /// Only codes 0-2 can be pressed under [`ButtonPolicy::Strict`].
    pub fn is_button_code_pressed(&self, code: i16) -> bool {
        self.tracker.borrow().buttons.contains(&code)
    }

    /// Last pointer position relative to the surface's top-left corner
    pub fn pointer_position(&self) -> PointerPosition {
        self.tracker.borrow().position
    }

    pub fn pressed_keys(&self) -> Vec<String> {
        self.tracker.borrow().snapshot().keys
    }

    pub fn pressed_buttons(&self) -> Vec<MouseButton> {
        let tracker = self.tracker.borrow();
        MouseButton::ALL
            .into_iter()
            .filter(|button| tracker.buttons.contains(&button.code()))
            .collect()
    }

    pub fn snapshot(&self) -> InputSnapshot {
        self.tracker.borrow().snapshot()
    }

    pub fn button_policy(&self) -> ButtonPolicy {
        self.tracker.borrow().policy
    }

    /// Release every pointer button
    ///
    /// Keys and pointer position are left untouched. Call this when a
    /// button-up may have been missed, e.g. after the window lost focus.
    pub fn reset(&mut self) {
        let mut tracker = self.tracker.borrow_mut();
        if !tracker.buttons.is_empty() {
            debug!(released = tracker.buttons.len(), "pointer buttons reset");
        }
        tracker.buttons.clear();
    }

    /// Returns true until [`destroy`](Self::destroy) has run
    pub fn is_active(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Detach all listeners; calling again is a no-op
    pub fn destroy(&mut self) {
        if self.listeners.is_empty() {
            return;
        }

        let hub = &self.hub;
        let detached = self
            .listeners
            .drain(..)
            .filter(|&id| hub.unsubscribe(id))
            .count();
        info!(surface = %self.surface, detached, "input state destroyed");
    }
}

impl Drop for InputState {
    fn drop(&mut self) {
        self.destroy();
    }
}
