//! Library error type

use thiserror::Error;

use crate::input::{Channel, SurfaceId, Target};

/// Errors raised while wiring input state to a host
///
/// Event handling itself never fails; these only surface at construction or
/// configuration time.
#[derive(Debug, Error)]
pub enum InputError {
    /// The target surface is not (or no longer) registered with the hub
    #[error("unknown target surface {0}")]
    UnknownSurface(SurfaceId),

    /// A pointer channel was requested globally, or a keyboard channel on a surface
    #[error("channel {channel:?} cannot be subscribed on {target:?}")]
    ChannelScope { channel: Channel, target: Target },

    #[error("failed to load input configuration: {0}")]
    Config(#[from] config::ConfigError),
}
