//! Scene graph attachment core
//!
//! This crate decides where every renderable lives:
//!
//! - [`SceneGraph`] - Owns objects and displays; enforces the attachment rules
//! - [`Renderable`] - A drawable object with shape, appearance and transform
//! - [`ObjectKey`] / [`DisplayKey`] - Generational keys into the graph
//! - [`Display`] - A viewport and its root-level draw set
//! - [`Renderer`] - The draw-time registration interface ([`RenderSet`] implements it)
//! - [`ShapeTemplate`] / [`ObjectTemplate`] - Serializable object descriptions
//! - [`Transform3D`] - Position, axis/up orientation and scale
//! - [`Helix`] - Compound frame + curve object
//! - [`GraphValidator`] - Audits a graph for broken invariants

mod appearance;
mod display;
mod error;
mod graph;
mod helix;
mod object;
mod renderer;
mod shapes;
mod template;
mod transform;
mod validator;

pub use appearance::{color, Appearance, Color, Material};
pub use display::{Display, DisplayKey, DisplaySettings};
pub use error::{ConfigurationError, CycleError, InvalidTransitionError, SceneError};
pub use graph::SceneGraph;
pub use helix::{helix_points, Helix, HelixParams, CHORDS_PER_COIL, MAX_CHORDS};
pub use object::{FrameData, ObjectKey, Renderable};
pub use renderer::{RenderSet, Renderer};
pub use shapes::{Capabilities, ShapeTemplate};
pub use template::{Attachment, ObjectTemplate};
pub use transform::Transform3D;
pub use validator::{GraphValidator, InvariantViolation};

// Re-export the vector type for convenience
pub use visgraph_math::Vec3;
