//! Scene graph error types
//!
//! Every error here is a precondition violation detected before any state is
//! touched. The graph is left exactly as it was when one is returned.

use std::fmt;

use crate::display::DisplayKey;
use crate::object::ObjectKey;

/// Inconsistent configuration of a renderable, frame or display
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// The frame lives on a different display than the object
    CrossDisplay {
        /// The frame that was requested
        frame: ObjectKey,
        /// Display the frame belongs to
        frame_display: Option<DisplayKey>,
        /// Display the object belongs to (or was asked to belong to)
        display: Option<DisplayKey>,
    },
    /// The requested parent is not a frame
    NotAFrame(ObjectKey),
    /// The display key does not refer to a live display
    UnknownDisplay(DisplayKey),
    /// A visible object needs a display, directly or through its frame
    NoDisplay,
    /// The shape needs uniform axes but the display has non-uniform axes
    NonUniformDisplay {
        /// Shape kind that was rejected
        shape: &'static str,
    },
    /// The shape does not support this option
    UnsupportedOption {
        /// Shape kind that was rejected
        shape: &'static str,
        /// Name of the rejected option
        option: &'static str,
    },
    /// A shape may only be replaced by one of the same kind
    ShapeKindChange {
        /// Current shape kind
        from: &'static str,
        /// Rejected replacement kind
        to: &'static str,
    },
    /// An object template could not be parsed or is out of range
    InvalidTemplate(String),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::CrossDisplay { frame, frame_display, display } => write!(
                f,
                "Frame {:?} is on display {:?} but the object is on display {:?}",
                frame, frame_display, display
            ),
            ConfigurationError::NotAFrame(key) => write!(f, "Object {:?} is not a frame", key),
            ConfigurationError::UnknownDisplay(key) => write!(f, "Unknown display {:?}", key),
            ConfigurationError::NoDisplay => {
                write!(f, "A visible object needs a display")
            }
            ConfigurationError::NonUniformDisplay { shape } => {
                write!(f, "Cannot place a {} on a display with non-uniform axes", shape)
            }
            ConfigurationError::UnsupportedOption { shape, option } => {
                write!(f, "A {} does not support the '{}' option", shape, option)
            }
            ConfigurationError::ShapeKindChange { from, to } => {
                write!(f, "Cannot turn a {} into a {}", from, to)
            }
            ConfigurationError::InvalidTemplate(msg) => write!(f, "Invalid template: {}", msg),
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// A state change that is not allowed from the object's current attachment
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidTransitionError {
    /// The display of a frame-owned object cannot change
    DisplayChangeWhileFramed {
        /// The frame that currently owns the object
        frame: ObjectKey,
    },
    /// An object that is on no display cannot be shown
    ShowDetached,
}

impl fmt::Display for InvalidTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidTransitionError::DisplayChangeWhileFramed { frame } => write!(
                f,
                "Cannot change display while parented to frame {:?}; clear the frame first",
                frame
            ),
            InvalidTransitionError::ShowDetached => {
                write!(f, "Cannot show an object that is on no display")
            }
        }
    }
}

impl std::error::Error for InvalidTransitionError {}

/// Reparenting would create a cycle of reference frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleError {
    /// The object being reparented
    pub object: ObjectKey,
    /// The frame it was to be placed in
    pub frame: ObjectKey,
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Placing {:?} in frame {:?} would create a cycle of reference frames",
            self.object, self.frame
        )
    }
}

impl std::error::Error for CycleError {}

/// Error type for scene graph operations
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Inconsistent configuration
    Configuration(ConfigurationError),
    /// Disallowed state change
    InvalidTransition(InvalidTransitionError),
    /// Circular frame parent chain
    Cycle(CycleError),
    /// The key does not refer to a live object
    NotFound(ObjectKey),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Configuration(e) => write!(f, "Configuration error: {}", e),
            SceneError::InvalidTransition(e) => write!(f, "Invalid transition: {}", e),
            SceneError::Cycle(e) => write!(f, "Cycle error: {}", e),
            SceneError::NotFound(key) => write!(f, "Object not found: {:?}", key),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Configuration(e) => Some(e),
            SceneError::InvalidTransition(e) => Some(e),
            SceneError::Cycle(e) => Some(e),
            SceneError::NotFound(_) => None,
        }
    }
}

impl From<ConfigurationError> for SceneError {
    fn from(e: ConfigurationError) -> Self {
        SceneError::Configuration(e)
    }
}

impl From<InvalidTransitionError> for SceneError {
    fn from(e: InvalidTransitionError) -> Self {
        SceneError::InvalidTransition(e)
    }
}

impl From<CycleError> for SceneError {
    fn from(e: CycleError) -> Self {
        SceneError::Cycle(e)
    }
}
