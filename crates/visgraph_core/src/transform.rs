//! 3D Transform (position, orientation, scale)
//!
//! A Transform3D places a renderable in the space of its parent: the parent
//! frame's local space, or world space for objects attached directly to a display.
//! Orientation is expressed the same way the shapes describe it, as an `axis`
//! direction plus an `up` hint.

use visgraph_math::Vec3;
use serde::{Serialize, Deserialize};

/// A 3D transform with position, axis/up orientation and uniform scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform3D {
    /// Position in parent space
    pub position: Vec3,
    /// Local x axis in parent space (need not be normalized)
    pub axis: Vec3,
    /// Hint for the local y axis; orthogonalized against `axis`
    pub up: Vec3,
    /// Uniform scale factor
    pub scale: f32,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform3D {
    /// Create an identity transform
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            axis: Vec3::X,
            up: Vec3::Y,
            scale: 1.0,
        }
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Set the axis direction
    pub fn with_axis(mut self, axis: Vec3) -> Self {
        self.axis = axis;
        self
    }

    /// Set the up hint
    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = up;
        self
    }

    /// Set the uniform scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Orthonormal basis `(x, y, z)` of this transform's local space
    ///
    /// `x` follows `axis`. When `up` is parallel to `axis` (or zero) the first
    /// of +Y, +Z that is not parallel is used instead.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let mut x = self.axis.normalized();
        if x == Vec3::ZERO {
            x = Vec3::X;
        }

        let mut z = x.cross(self.up);
        if z.length_squared() < 1e-12 {
            z = x.cross(Vec3::Y);
            if z.length_squared() < 1e-12 {
                z = x.cross(Vec3::Z);
            }
        }
        let z = z.normalized();
        let y = z.cross(x);
        (x, y, z)
    }

    /// Rotate a direction from local space into parent space (no scale)
    pub fn rotate(&self, d: Vec3) -> Vec3 {
        let (x, y, z) = self.basis();
        x * d.x + y * d.y + z * d.z
    }

    /// Transform a point from local space to parent space
    ///
    /// Applies scale, then rotation, then translation.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotate(p * self.scale) + self.position
    }

    /// Transform a direction from local space to parent space
    ///
    /// Applies scale and rotation, but not translation.
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        self.rotate(d * self.scale)
    }

    /// Compose this (parent) transform with a child's local transform
    ///
    /// The result maps the child's local space directly into this transform's
    /// parent space: `self.compose(&c).transform_point(p) == self.transform_point(c.transform_point(p))`.
    pub fn compose(&self, child: &Transform3D) -> Transform3D {
        Transform3D {
            position: self.transform_point(child.position),
            axis: self.rotate(child.axis),
            up: self.rotate(child.up),
            scale: self.scale * child.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_identity_basis() {
        let (x, y, z) = Transform3D::identity().basis();
        assert!(x.approx_eq(Vec3::X, EPS));
        assert!(y.approx_eq(Vec3::Y, EPS));
        assert!(z.approx_eq(Vec3::Z, EPS));
    }

    #[test]
    fn test_transform_point_translation_only() {
        let t = Transform3D::from_position(Vec3::new(1.0, 2.0, 3.0));
        let p = t.transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!(p.approx_eq(Vec3::new(2.0, 2.0, 3.0), EPS));
    }

    #[test]
    fn test_quarter_turn_about_z() {
        // axis along +Y with up along -X is a 90 degree turn about +Z
        let t = Transform3D::identity().with_axis(Vec3::Y).with_up(-Vec3::X);
        assert!(t.rotate(Vec3::X).approx_eq(Vec3::Y, EPS));
        assert!(t.rotate(Vec3::Y).approx_eq(-Vec3::X, EPS));
        assert!(t.rotate(Vec3::Z).approx_eq(Vec3::Z, EPS));
    }

    #[test]
    fn test_up_parallel_to_axis_falls_back() {
        let t = Transform3D::identity().with_axis(Vec3::Y);
        let (x, y, z) = t.basis();
        assert!(x.approx_eq(Vec3::Y, EPS));
        assert!(x.dot(y).abs() < EPS);
        assert!(x.dot(z).abs() < EPS);
        assert!((y.length() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_scale_applies_before_translation() {
        let t = Transform3D::from_position(Vec3::new(0.0, 1.0, 0.0)).with_scale(2.0);
        let p = t.transform_point(Vec3::new(1.0, 1.0, 1.0));
        assert!(p.approx_eq(Vec3::new(2.0, 3.0, 2.0), EPS));
        assert!(t.transform_direction(Vec3::X).approx_eq(Vec3::new(2.0, 0.0, 0.0), EPS));
    }

    #[test]
    fn test_compose_matches_nested_application() {
        let parent = Transform3D::from_position(Vec3::new(1.0, 0.0, 0.0))
            .with_axis(Vec3::Y)
            .with_up(-Vec3::X)
            .with_scale(2.0);
        let child = Transform3D::from_position(Vec3::new(1.0, 0.5, 0.0))
            .with_axis(Vec3::new(1.0, 1.0, 0.0));

        let composed = parent.compose(&child);
        for p in [Vec3::ZERO, Vec3::X, Vec3::new(0.3, -1.0, 2.0)] {
            let nested = parent.transform_point(child.transform_point(p));
            assert!(
                composed.transform_point(p).approx_eq(nested, EPS),
                "mismatch for {:?}",
                p
            );
        }
    }

    #[test]
    fn test_transform_serialization_uses_defaults() {
        let t: Transform3D = ron::from_str("(position: (x: 1.0, y: 2.0, z: 3.0))").unwrap();
        assert_eq!(t.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.axis, Vec3::X);
        assert_eq!(t.scale, 1.0);
    }
}
