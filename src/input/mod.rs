//! Input state tracking
//!
//! Turns raw pointer and keyboard events from a host into a pollable
//! snapshot of what is pressed and where the pointer is:
//! - [`EventHub`] stands in for the host: surfaces, channels, listeners
//! - [`InputState`] subscribes to five channels and caches derived state
//! - [`InputCollector`] feeds winit window events into a hub
//!
//! # Architecture
//!
//! ```text
//! Raw Input (winit) → InputCollector → EventHub
//!                                         ↓
//!                            pointer-move/down/up (surface)
//!                            key-down/up (global)
//!                                         ↓
//!                                    InputState
//!                                  (polled by caller)
//! ```
//!
//! # Usage
//!
//! ```
//! use std::rc::Rc;
//! use input_state::input::{EventHub, InputState, MouseButton, Rect, RectSurface, ValidKeySet};
//!
//! let hub = EventHub::new();
//! let canvas = hub.add_surface(Rc::new(RectSurface::new(Rect::new(10.0, 20.0, 100.0, 100.0))));
//! let mut input = InputState::new(&hub, canvas, ValidKeySet::default())?;
//!
//! hub.pointer_move(canvas, 60.0, 80.0);
//! hub.pointer_down(canvas, 0);
//! hub.key_down("ArrowUp");
//!
//! assert_eq!((input.pointer_position().x, input.pointer_position().y), (50.0, 60.0));
//! assert!(input.is_pointer_button_pressed(MouseButton::Left));
//! assert!(input.is_key_pressed("ArrowUp"));
//!
//! input.destroy();
//! # Ok::<(), input_state::InputError>(())
//! ```

mod collector;
mod events;
mod host;
mod keys;
mod state;

// Re-export public API
pub use collector::{InputCollector, button_code, key_identifier};
pub use events::{Channel, HostEvent, KeyboardEvent, MouseButton, PointerEvent, PointerPosition};
pub use host::{EventHub, Listener, ListenerId, Rect, RectSurface, Surface, SurfaceId, Target};
pub use keys::ValidKeySet;
pub use state::{ButtonPolicy, InputSnapshot, InputState};
