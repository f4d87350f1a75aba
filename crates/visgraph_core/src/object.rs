//! Renderable objects
//!
//! A Renderable is anything the renderer can draw: a shape, a label, a light or
//! a frame. Its attachment state (display, frame, visibility) is private and
//! only changes through [`SceneGraph`](crate::SceneGraph) operations, which keep
//! the container sets and the renderer in step with it.

use slotmap::new_key_type;

use crate::appearance::{Appearance, Color, Material};
use crate::display::DisplayKey;
use crate::error::ConfigurationError;
use crate::shapes::{Capabilities, ShapeTemplate};
use crate::transform::Transform3D;

new_key_type! {
    /// Key to a renderable in the scene graph
    ///
    /// Uses generational indexing, so a key to a removed object returns None
    /// instead of reaching whatever reused its slot.
    pub struct ObjectKey;
}

/// Child bookkeeping carried by frames
#[derive(Debug, Clone, Default)]
pub struct FrameData {
    children: Vec<ObjectKey>,
}

impl FrameData {
    /// Visible children in draw order
    pub fn children(&self) -> &[ObjectKey] {
        &self.children
    }

    /// Add a child; returns false if it was already present
    pub(crate) fn add_child(&mut self, key: ObjectKey) -> bool {
        if self.children.contains(&key) {
            return false;
        }
        self.children.push(key);
        true
    }

    /// Remove a child; returns false if it was not present
    pub(crate) fn remove_child(&mut self, key: ObjectKey) -> bool {
        let before = self.children.len();
        self.children.retain(|&k| k != key);
        self.children.len() != before
    }
}

/// A drawable object in the scene graph
#[derive(Debug, Clone)]
pub struct Renderable {
    /// Optional name (for lookup and logging)
    pub name: Option<String>,
    /// Local transform relative to the frame, or to the display when unframed
    pub transform: Transform3D,
    shape: ShapeTemplate,
    appearance: Appearance,
    display: Option<DisplayKey>,
    frame: Option<ObjectKey>,
    visible: bool,
    frame_data: Option<FrameData>,
}

impl Renderable {
    /// Create a detached, hidden renderable
    pub(crate) fn new(shape: ShapeTemplate, transform: Transform3D, appearance: Appearance) -> Self {
        let frame_data = shape.is_frame().then(FrameData::default);
        Self {
            name: None,
            transform,
            shape,
            appearance,
            display: None,
            frame: None,
            visible: false,
            frame_data,
        }
    }

    /// Shape parameters
    pub fn shape(&self) -> &ShapeTemplate {
        &self.shape
    }

    /// Capabilities of this object's shape
    pub fn capabilities(&self) -> Capabilities {
        self.shape.capabilities()
    }

    /// Check whether this object is a frame
    #[inline]
    pub fn is_frame(&self) -> bool {
        self.frame_data.is_some()
    }

    /// Replace the shape parameters
    ///
    /// The new shape must be of the same kind; a sphere cannot become a frame.
    pub fn set_shape(&mut self, shape: ShapeTemplate) -> Result<(), ConfigurationError> {
        if !self.shape.same_kind(&shape) {
            return Err(ConfigurationError::ShapeKindChange {
                from: self.shape.kind(),
                to: shape.kind(),
            });
        }
        self.shape = shape;
        Ok(())
    }

    /// Visual properties
    pub fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    /// Set the color
    pub fn set_color(&mut self, color: Color) {
        self.appearance.color = color;
    }

    /// Set the material
    pub fn set_material(&mut self, material: Material) {
        self.appearance.material = material;
    }

    /// Set the opacity
    ///
    /// Array objects (curves, points, faces, convex hulls) do not support opacity.
    pub fn set_opacity(&mut self, opacity: f32) -> Result<(), ConfigurationError> {
        if self.capabilities().contains(Capabilities::ARRAY_OBJECT) {
            return Err(ConfigurationError::UnsupportedOption {
                shape: self.shape.kind(),
                option: "opacity",
            });
        }
        if !(0.0..=1.0).contains(&opacity) {
            return Err(ConfigurationError::InvalidTemplate(format!(
                "opacity {} is outside 0..=1",
                opacity
            )));
        }
        self.appearance.opacity = opacity;
        Ok(())
    }

    /// Display this object belongs to
    #[inline]
    pub fn display(&self) -> Option<DisplayKey> {
        self.display
    }

    /// Frame that owns this object
    #[inline]
    pub fn frame(&self) -> Option<ObjectKey> {
        self.frame
    }

    /// Whether this object is drawn
    #[inline]
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Visible children, if this object is a frame
    pub fn children(&self) -> &[ObjectKey] {
        match &self.frame_data {
            Some(data) => data.children(),
            None => &[],
        }
    }

    /// Copy of this object with no attachment and, for frames, no children
    pub(crate) fn detached_copy(&self) -> Self {
        Self {
            name: self.name.clone(),
            transform: self.transform,
            shape: self.shape.clone(),
            appearance: self.appearance,
            display: None,
            frame: None,
            visible: false,
            frame_data: self.frame_data.as_ref().map(|_| FrameData::default()),
        }
    }

    pub(crate) fn set_attachment(&mut self, display: Option<DisplayKey>, frame: Option<ObjectKey>) {
        self.display = display;
        self.frame = frame;
    }

    pub(crate) fn set_display_ref(&mut self, display: Option<DisplayKey>) {
        self.display = display;
    }

    pub(crate) fn set_frame_ref(&mut self, frame: Option<ObjectKey>) {
        self.frame = frame;
    }

    pub(crate) fn set_visible_flag(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) fn frame_data_mut(&mut self) -> Option<&mut FrameData> {
        self.frame_data.as_mut()
    }
}
