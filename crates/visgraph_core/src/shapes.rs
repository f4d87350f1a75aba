//! Serializable shape templates and their capabilities
//!
//! ShapeTemplate stores the construction parameters of every primitive the
//! renderer knows how to draw. The scene graph never looks inside the
//! parameters; it only asks a shape for its [`Capabilities`], which decide the
//! checks applied when the object is spawned or moved.
//!
//! All shapes are described in **local space**. The object's transform places
//! them in the space of their frame or display.

use bitflags::bitflags;
use serde::{Serialize, Deserialize};
use visgraph_math::Vec3;

use crate::appearance::Color;

bitflags! {
    /// What a shape kind supports or requires
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Capabilities: u8 {
        /// Needs a display whose axes share one scale
        const UNIFORM_AXIS = 1 << 0;
        /// Per-vertex arrays (positions/colors); no opacity support
        const ARRAY_OBJECT = 1 << 1;
        /// A light source; defaults to white instead of the display foreground
        const LIGHT = 1 << 2;
        /// Can parent other renderables
        const FRAME = 1 << 3;
    }
}

fn one() -> f32 {
    1.0
}

fn unit_size() -> Vec3 {
    Vec3::ONE
}

fn ring_thickness() -> f32 {
    0.1
}

fn label_height() -> u32 {
    13
}

fn point_size() -> f32 {
    5.0
}

fn light_direction() -> Vec3 {
    Vec3::Z
}

/// Serializable shape template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum ShapeTemplate {
    /// Sphere centered at the origin
    Sphere {
        #[serde(default = "one")]
        radius: f32,
    },
    /// Ellipsoid centered at the origin with full extents `size`
    Ellipsoid {
        #[serde(default = "unit_size")]
        size: Vec3,
    },
    /// Rectangular box centered at the origin with full extents `size`
    Box {
        #[serde(default = "unit_size")]
        size: Vec3,
    },
    /// Cylinder from the origin along the local x axis
    Cylinder {
        #[serde(default = "one")]
        radius: f32,
        #[serde(default = "one")]
        length: f32,
    },
    /// Cone with its base at the origin, tip along the local x axis
    Cone {
        #[serde(default = "one")]
        radius: f32,
        #[serde(default = "one")]
        length: f32,
    },
    /// Square pyramid with its base at the origin, tip along the local x axis
    Pyramid {
        #[serde(default = "unit_size")]
        size: Vec3,
    },
    /// Torus around the local x axis
    Ring {
        #[serde(default = "one")]
        radius: f32,
        #[serde(default = "ring_thickness")]
        thickness: f32,
    },
    /// Arrow from the origin along the local x axis
    ///
    /// Unset widths are derived from the length by the renderer.
    Arrow {
        #[serde(default = "one")]
        length: f32,
        #[serde(default)]
        shaft_width: Option<f32>,
        #[serde(default)]
        head_width: Option<f32>,
        #[serde(default)]
        head_length: Option<f32>,
    },
    /// Screen-aligned text anchored at the origin
    Label {
        text: String,
        /// Outline color; the display foreground when unset
        #[serde(default)]
        linecolor: Option<Color>,
        /// Font height in pixels
        #[serde(default = "label_height")]
        height: u32,
    },
    /// Polyline through `points`; `radius` 0 draws a hairline
    Curve {
        #[serde(default)]
        points: Vec<Vec3>,
        #[serde(default)]
        radius: f32,
    },
    /// Point cloud
    Points {
        #[serde(default)]
        points: Vec<Vec3>,
        #[serde(default = "point_size")]
        size: f32,
    },
    /// Triangle soup, three vertices per face
    Faces {
        #[serde(default)]
        vertices: Vec<Vec3>,
    },
    /// Convex hull of `points`
    Convex {
        #[serde(default)]
        points: Vec<Vec3>,
    },
    /// Light at infinity shining along `direction`; has no position
    DistantLight {
        #[serde(default = "light_direction")]
        direction: Vec3,
    },
    /// Point light at the object's position; has no direction
    LocalLight,
    /// Reference frame grouping other renderables
    Frame,
}

impl ShapeTemplate {
    /// Lowercase name of the shape kind
    pub fn kind(&self) -> &'static str {
        match self {
            ShapeTemplate::Sphere { .. } => "sphere",
            ShapeTemplate::Ellipsoid { .. } => "ellipsoid",
            ShapeTemplate::Box { .. } => "box",
            ShapeTemplate::Cylinder { .. } => "cylinder",
            ShapeTemplate::Cone { .. } => "cone",
            ShapeTemplate::Pyramid { .. } => "pyramid",
            ShapeTemplate::Ring { .. } => "ring",
            ShapeTemplate::Arrow { .. } => "arrow",
            ShapeTemplate::Label { .. } => "label",
            ShapeTemplate::Curve { .. } => "curve",
            ShapeTemplate::Points { .. } => "points",
            ShapeTemplate::Faces { .. } => "faces",
            ShapeTemplate::Convex { .. } => "convex",
            ShapeTemplate::DistantLight { .. } => "distant_light",
            ShapeTemplate::LocalLight => "local_light",
            ShapeTemplate::Frame => "frame",
        }
    }

    /// Capabilities of this shape kind
    pub fn capabilities(&self) -> Capabilities {
        match self {
            ShapeTemplate::Sphere { .. }
            | ShapeTemplate::Ellipsoid { .. }
            | ShapeTemplate::Box { .. }
            | ShapeTemplate::Cylinder { .. }
            | ShapeTemplate::Cone { .. }
            | ShapeTemplate::Pyramid { .. }
            | ShapeTemplate::Ring { .. }
            | ShapeTemplate::Arrow { .. } => Capabilities::UNIFORM_AXIS,
            ShapeTemplate::Convex { .. } => Capabilities::UNIFORM_AXIS | Capabilities::ARRAY_OBJECT,
            ShapeTemplate::Curve { .. }
            | ShapeTemplate::Points { .. }
            | ShapeTemplate::Faces { .. } => Capabilities::ARRAY_OBJECT,
            ShapeTemplate::DistantLight { .. } | ShapeTemplate::LocalLight => Capabilities::LIGHT,
            ShapeTemplate::Label { .. } => Capabilities::empty(),
            ShapeTemplate::Frame => Capabilities::UNIFORM_AXIS | Capabilities::FRAME,
        }
    }

    /// Check whether this shape can parent other renderables
    #[inline]
    pub fn is_frame(&self) -> bool {
        self.capabilities().contains(Capabilities::FRAME)
    }

    /// Check whether `other` is the same kind of shape
    pub fn same_kind(&self, other: &ShapeTemplate) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Create a sphere template
    pub fn sphere(radius: f32) -> Self {
        ShapeTemplate::Sphere { radius }
    }

    /// Create a box template
    pub fn cuboid(size: Vec3) -> Self {
        ShapeTemplate::Box { size }
    }

    /// Create an arrow template with derived widths
    pub fn arrow(length: f32) -> Self {
        ShapeTemplate::Arrow {
            length,
            shaft_width: None,
            head_width: None,
            head_length: None,
        }
    }

    /// Create a label template
    pub fn label(text: impl Into<String>) -> Self {
        ShapeTemplate::Label {
            text: text.into(),
            linecolor: None,
            height: label_height(),
        }
    }

    /// Create a curve template
    pub fn curve(points: Vec<Vec3>, radius: f32) -> Self {
        ShapeTemplate::Curve { points, radius }
    }

    /// Create a frame template
    pub fn frame() -> Self {
        ShapeTemplate::Frame
    }

    /// Vertex data of point-list shapes, packed for upload
    pub fn vertex_bytes(&self) -> Option<&[u8]> {
        match self {
            ShapeTemplate::Curve { points, .. }
            | ShapeTemplate::Points { points, .. }
            | ShapeTemplate::Convex { points } => Some(Vec3::slice_as_bytes(points)),
            ShapeTemplate::Faces { vertices } => Some(Vec3::slice_as_bytes(vertices)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_shapes_need_uniform_axes() {
        for shape in [
            ShapeTemplate::sphere(1.0),
            ShapeTemplate::cuboid(Vec3::ONE),
            ShapeTemplate::arrow(2.0),
            ShapeTemplate::frame(),
        ] {
            assert!(
                shape.capabilities().contains(Capabilities::UNIFORM_AXIS),
                "{} should need uniform axes",
                shape.kind()
            );
        }
        assert!(!ShapeTemplate::label("hi").capabilities().contains(Capabilities::UNIFORM_AXIS));
    }

    #[test]
    fn test_array_objects() {
        let curve = ShapeTemplate::curve(vec![Vec3::ZERO, Vec3::X], 0.0);
        assert!(curve.capabilities().contains(Capabilities::ARRAY_OBJECT));
        assert!(!curve.capabilities().contains(Capabilities::UNIFORM_AXIS));

        let convex = ShapeTemplate::Convex { points: Vec::new() };
        assert!(convex.capabilities().contains(Capabilities::ARRAY_OBJECT | Capabilities::UNIFORM_AXIS));
    }

    #[test]
    fn test_only_frame_is_frame() {
        assert!(ShapeTemplate::frame().is_frame());
        assert!(!ShapeTemplate::sphere(1.0).is_frame());
        assert!(!ShapeTemplate::LocalLight.is_frame());
    }

    #[test]
    fn test_same_kind_ignores_parameters() {
        assert!(ShapeTemplate::sphere(1.0).same_kind(&ShapeTemplate::sphere(3.0)));
        assert!(!ShapeTemplate::sphere(1.0).same_kind(&ShapeTemplate::frame()));
    }

    #[test]
    fn test_defaults_from_ron() {
        let shape: ShapeTemplate = ron::from_str("Cylinder(radius: 0.5)").unwrap();
        assert_eq!(shape, ShapeTemplate::Cylinder { radius: 0.5, length: 1.0 });

        let shape: ShapeTemplate = ron::from_str("Label(text: \"x\")").unwrap();
        match shape {
            ShapeTemplate::Label { linecolor, height, .. } => {
                assert_eq!(linecolor, None);
                assert_eq!(height, 13);
            }
            _ => panic!("Expected Label variant"),
        }
    }

    #[test]
    fn test_unit_variant_from_ron() {
        let shape: ShapeTemplate = ron::from_str("Frame").unwrap();
        assert!(shape.is_frame());
    }

    #[test]
    fn test_vertex_bytes() {
        let curve = ShapeTemplate::curve(vec![Vec3::ZERO, Vec3::X, Vec3::Y], 0.1);
        let bytes = curve.vertex_bytes().unwrap();
        assert_eq!(bytes.len(), 3 * std::mem::size_of::<Vec3>());
        assert_eq!(&bytes[12..16], &1.0f32.to_ne_bytes());
        assert!(ShapeTemplate::sphere(1.0).vertex_bytes().is_none());
        assert!(ShapeTemplate::frame().vertex_bytes().is_none());
    }
}
