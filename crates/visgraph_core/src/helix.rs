//! Helix compound object
//!
//! A helix is a frame positioned and oriented by the caller, holding a curve
//! that winds around the frame's local x axis. Moving, reparenting or hiding
//! the helix acts on the frame; the curve rides along as its child.

use std::f32::consts::TAU;

use serde::{Serialize, Deserialize};
use visgraph_math::Vec3;

use crate::appearance::{color, Color};
use crate::display::DisplayKey;
use crate::error::{ConfigurationError, SceneError};
use crate::graph::SceneGraph;
use crate::object::ObjectKey;
use crate::renderer::Renderer;
use crate::shapes::ShapeTemplate;
use crate::template::{Attachment, ObjectTemplate};
use crate::transform::Transform3D;

/// Number of curve segments in one turn of a helix
pub const CHORDS_PER_COIL: u32 = 20;

/// Most curve segments a helix may have (5000 coils)
pub const MAX_CHORDS: u32 = 100_000;

/// Parameters of a new helix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HelixParams {
    /// Start of the helix
    pub pos: Vec3,
    /// Direction and length of the helix
    pub axis: Vec3,
    /// Up hint for the helix frame
    pub up: Vec3,
    /// Coil radius
    pub radius: f32,
    /// Number of turns
    pub coils: u32,
    /// Wire thickness; `radius / 20` when unset
    pub thickness: Option<f32>,
    /// Wire color; white when unset
    pub color: Option<Color>,
}

impl Default for HelixParams {
    fn default() -> Self {
        Self {
            pos: Vec3::ZERO,
            axis: Vec3::X,
            up: Vec3::Y,
            radius: 1.0,
            coils: 5,
            thickness: None,
            color: None,
        }
    }
}

/// Points of a helix of `coils` turns along +x, `length` long
///
/// Fails for zero coils, a non-positive length, or more than [`MAX_CHORDS`]
/// segments.
pub fn helix_points(length: f32, radius: f32, coils: u32) -> Result<Vec<Vec3>, ConfigurationError> {
    let chords = chord_count(length, coils)?;
    let dx = length / chords as f32;
    let k = coils as f32 * TAU / length;
    Ok((0..=chords)
        .map(|i| {
            let x = i as f32 * dx;
            Vec3::new(x, radius * (k * x).sin(), radius * (k * x).cos())
        })
        .collect())
}

fn chord_count(length: f32, coils: u32) -> Result<u32, ConfigurationError> {
    if coils == 0 {
        return Err(ConfigurationError::InvalidTemplate("helix needs at least one coil".into()));
    }
    if length <= 0.0 || !length.is_finite() {
        return Err(ConfigurationError::InvalidTemplate(format!(
            "helix length must be positive, got {}",
            length
        )));
    }
    coils
        .checked_mul(CHORDS_PER_COIL)
        .filter(|&chords| chords <= MAX_CHORDS)
        .ok_or_else(|| {
            ConfigurationError::InvalidTemplate(format!(
                "helix of {} coils exceeds {} chords",
                coils, MAX_CHORDS
            ))
        })
}

/// Handle to a helix living in a scene graph
#[derive(Debug, Clone, PartialEq)]
pub struct Helix {
    frame: ObjectKey,
    curve: ObjectKey,
    length: f32,
    radius: f32,
    coils: u32,
    thickness: f32,
}

impl Helix {
    /// The frame that places the helix
    pub fn frame(&self) -> ObjectKey {
        self.frame
    }

    /// The curve drawing the wire
    pub fn curve(&self) -> ObjectKey {
        self.curve
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn coils(&self) -> u32 {
        self.coils
    }

    pub fn thickness(&self) -> f32 {
        self.thickness
    }

    /// Position of the helix start in its parent space
    pub fn pos<R: Renderer>(&self, graph: &SceneGraph<R>) -> Option<Vec3> {
        graph.get(self.frame).map(|f| f.transform.position)
    }

    /// Move the helix start
    pub fn set_pos<R: Renderer>(&self, graph: &mut SceneGraph<R>, pos: Vec3) -> Result<(), SceneError> {
        self.placement_mut(graph)?.position = pos;
        Ok(())
    }

    /// Move the helix start along x only
    pub fn set_x<R: Renderer>(&self, graph: &mut SceneGraph<R>, x: f32) -> Result<(), SceneError> {
        self.placement_mut(graph)?.position.x = x;
        Ok(())
    }

    /// Move the helix start along y only
    pub fn set_y<R: Renderer>(&self, graph: &mut SceneGraph<R>, y: f32) -> Result<(), SceneError> {
        self.placement_mut(graph)?.position.y = y;
        Ok(())
    }

    /// Move the helix start along z only
    pub fn set_z<R: Renderer>(&self, graph: &mut SceneGraph<R>, z: f32) -> Result<(), SceneError> {
        self.placement_mut(graph)?.position.z = z;
        Ok(())
    }

    /// Direction of the helix scaled to its length
    pub fn axis<R: Renderer>(&self, graph: &SceneGraph<R>) -> Option<Vec3> {
        graph.get(self.frame).map(|f| f.transform.axis.normalized() * self.length)
    }

    /// Point the helix along `axis`; its length becomes the axis length
    pub fn set_axis<R: Renderer>(&mut self, graph: &mut SceneGraph<R>, axis: Vec3) -> Result<(), SceneError> {
        let length = axis.length();
        if !graph.contains(self.frame) {
            return Err(SceneError::NotFound(self.frame));
        }
        self.rebuild(graph, length, self.radius, self.coils, self.thickness)?;
        self.placement_mut(graph)?.axis = axis.normalized();
        self.length = length;
        Ok(())
    }

    /// Stretch the helix to `length`, keeping its direction
    pub fn set_length<R: Renderer>(&mut self, graph: &mut SceneGraph<R>, length: f32) -> Result<(), SceneError> {
        if length == self.length {
            return Ok(());
        }
        self.rebuild(graph, length, self.radius, self.coils, self.thickness)?;
        self.length = length;
        Ok(())
    }

    /// Up hint of the helix frame
    pub fn up<R: Renderer>(&self, graph: &SceneGraph<R>) -> Option<Vec3> {
        graph.get(self.frame).map(|f| f.transform.up)
    }

    /// Change the up hint of the helix frame
    pub fn set_up<R: Renderer>(&self, graph: &mut SceneGraph<R>, up: Vec3) -> Result<(), SceneError> {
        self.placement_mut(graph)?.up = up;
        Ok(())
    }

    /// Wire color
    pub fn color<R: Renderer>(&self, graph: &SceneGraph<R>) -> Option<Color> {
        graph.get(self.curve).map(|c| c.appearance().color)
    }

    /// Recolor the wire
    pub fn set_color<R: Renderer>(&self, graph: &mut SceneGraph<R>, color: Color) -> Result<(), SceneError> {
        let curve = graph.get_mut(self.curve).ok_or(SceneError::NotFound(self.curve))?;
        curve.set_color(color);
        Ok(())
    }

    /// Change the number of turns
    pub fn set_coils<R: Renderer>(&mut self, graph: &mut SceneGraph<R>, coils: u32) -> Result<(), SceneError> {
        if coils == self.coils {
            return Ok(());
        }
        self.rebuild(graph, self.length, self.radius, coils, self.thickness)?;
        self.coils = coils;
        Ok(())
    }

    /// Change the coil radius
    pub fn set_radius<R: Renderer>(&mut self, graph: &mut SceneGraph<R>, radius: f32) -> Result<(), SceneError> {
        self.rebuild(graph, self.length, radius, self.coils, self.thickness)?;
        self.radius = radius;
        Ok(())
    }

    /// Change the wire thickness
    pub fn set_thickness<R: Renderer>(&mut self, graph: &mut SceneGraph<R>, thickness: f32) -> Result<(), SceneError> {
        if thickness == self.thickness {
            return Ok(());
        }
        self.rebuild(graph, self.length, self.radius, self.coils, thickness)?;
        self.thickness = thickness;
        Ok(())
    }

    /// Place the helix in a frame, or take it out with `None`
    pub fn set_frame<R: Renderer>(&self, graph: &mut SceneGraph<R>, frame: Option<ObjectKey>) -> Result<(), SceneError> {
        graph.set_frame(self.frame, frame)
    }

    /// Move the helix to another display
    pub fn set_display<R: Renderer>(&self, graph: &mut SceneGraph<R>, display: DisplayKey) -> Result<(), SceneError> {
        graph.set_display(self.frame, display)
    }

    /// Show or hide the helix
    pub fn set_visible<R: Renderer>(&self, graph: &mut SceneGraph<R>, visible: bool) -> Result<(), SceneError> {
        if !graph.contains(self.curve) {
            return Err(SceneError::NotFound(self.curve));
        }
        graph.set_visible(self.frame, visible)?;
        graph.set_visible(self.curve, visible)
    }

    /// Remove both parts from the graph
    pub fn remove<R: Renderer>(self, graph: &mut SceneGraph<R>) -> Result<(), SceneError> {
        graph.remove(self.curve)?;
        graph.remove(self.frame)?;
        Ok(())
    }

    fn placement_mut<'g, R: Renderer>(&self, graph: &'g mut SceneGraph<R>) -> Result<&'g mut Transform3D, SceneError> {
        graph
            .get_mut(self.frame)
            .map(|f| &mut f.transform)
            .ok_or(SceneError::NotFound(self.frame))
    }

    fn rebuild<R: Renderer>(
        &self,
        graph: &mut SceneGraph<R>,
        length: f32,
        radius: f32,
        coils: u32,
        thickness: f32,
    ) -> Result<(), SceneError> {
        let points = helix_points(length, radius, coils)?;
        let curve = graph.get_mut(self.curve).ok_or(SceneError::NotFound(self.curve))?;
        curve.set_shape(ShapeTemplate::curve(points, thickness / 2.0))?;
        Ok(())
    }
}

impl<R: Renderer> SceneGraph<R> {
    /// Create a helix: a frame at `params.pos` along `params.axis` holding the wire
    ///
    /// The attachment applies to the frame; the wire is spawned inside it with
    /// the same visibility. The wire is white unless `params.color` is set.
    pub fn spawn_helix(&mut self, attachment: Attachment, params: HelixParams) -> Result<Helix, SceneError> {
        let length = params.axis.length();
        let points = match helix_points(length, params.radius, params.coils) {
            Ok(points) => points,
            Err(e) => {
                log::warn!("spawn_helix rejected: {}", e);
                return Err(e.into());
            }
        };
        let thickness = params.thickness.unwrap_or(params.radius / 20.0);

        let placement = Transform3D::from_position(params.pos)
            .with_axis(params.axis.normalized())
            .with_up(params.up);
        let frame = self.spawn(
            attachment,
            ObjectTemplate::new(ShapeTemplate::frame()).with_transform(placement),
        )?;

        let wire = ObjectTemplate::new(ShapeTemplate::curve(points, thickness / 2.0))
            .with_color(params.color.unwrap_or(color::WHITE));
        let wire_attachment = Attachment {
            display: None,
            frame: Some(frame),
            visible: attachment.visible,
        };

        let curve = match self.spawn(wire_attachment, wire) {
            Ok(curve) => curve,
            Err(e) => {
                if let Err(cleanup) = self.remove(frame) {
                    log::error!("Failed to remove helix frame {:?}: {}", frame, cleanup);
                }
                return Err(e);
            }
        };

        Ok(Helix {
            frame,
            curve,
            length,
            radius: params.radius,
            coils: params.coils,
            thickness,
        })
    }
}
