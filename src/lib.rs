//! Input State
//!
//! Pollable keyboard and pointer state built from host events.

/// Layered configuration (profile files and environment)
pub mod config;

/// Library error type
pub mod error;

/// Event hub, input state and the winit adapter
pub mod input;

pub use config::InputConfig;
pub use error::InputError;
pub use input::{InputState, MouseButton, PointerPosition, ValidKeySet};
