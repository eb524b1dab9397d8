use std::error::Error;
use std::fmt;

use crate::engine::EngineState;

/// Engine-wide error.
///
/// Keep this small and stable. Platforms and games map their own failures into it.
#[derive(Debug)]
pub enum EngineError {
    /// Config values that can never produce a window (zero sizes, overflow).
    InvalidConfig(String),

    /// Config file could not be read or parsed.
    Config(String),

    /// A lifecycle operation was called in the wrong state.
    InvalidState {
        op: &'static str,
        state: EngineState,
    },

    /// The native collaborator failed (window, surface, present).
    Platform(String),

    /// A game hook returned an error.
    Hook {
        hook: HookStage,
        cause: Box<EngineError>,
    },

    /// Generic error (fallback).
    Other(String),
}

/// Hook that produced an error, used for attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    Preload,
    Draw,
}

impl EngineError {
    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    #[inline]
    pub fn platform(msg: impl fmt::Display) -> Self {
        Self::Platform(msg.to_string())
    }

    #[inline]
    pub fn with_hook(hook: HookStage, err: EngineError) -> Self {
        match err {
            nested @ EngineError::Hook { .. } => nested,
            other => EngineError::Hook {
                hook,
                cause: Box::new(other),
            },
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidConfig(s) => write!(f, "invalid config: {s}"),
            EngineError::Config(s) => write!(f, "config: {s}"),
            EngineError::InvalidState { op, state } => {
                write!(f, "'{op}' is not allowed in state {state:?}")
            }
            EngineError::Platform(s) => write!(f, "platform: {s}"),
            EngineError::Hook { hook, cause } => write!(f, "hook {hook:?}: {cause}"),
            EngineError::Other(s) => write!(f, "{s}"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EngineError::Hook { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

impl From<&str> for EngineError {
    #[inline]
    fn from(value: &str) -> Self {
        EngineError::Other(value.to_string())
    }
}

impl From<String> for EngineError {
    #[inline]
    fn from(value: String) -> Self {
        EngineError::Other(value)
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
