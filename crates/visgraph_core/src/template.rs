//! Object templates and attachment requests
//!
//! An [`ObjectTemplate`] is the fixed set of options a renderable accepts at
//! spawn time. Unset options take their value from the target display (color,
//! material, label outline) or from the documented defaults. Unknown options
//! are rejected when the template is parsed.

use serde::{Serialize, Deserialize};

use crate::appearance::{color, Appearance, Color, Material};
use crate::display::{DisplayKey, DisplaySettings};
use crate::error::ConfigurationError;
use crate::object::ObjectKey;
use crate::shapes::{Capabilities, ShapeTemplate};
use crate::transform::Transform3D;

/// Where a new object should be attached, and whether it starts visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attachment {
    /// Target display; the frame's display (or the selected display) when unset
    pub display: Option<DisplayKey>,
    /// Parent frame
    pub frame: Option<ObjectKey>,
    /// Initial visibility
    pub visible: bool,
}

impl Default for Attachment {
    fn default() -> Self {
        Self {
            display: None,
            frame: None,
            visible: true,
        }
    }
}

impl Attachment {
    /// Visible on the selected display
    pub fn new() -> Self {
        Self::default()
    }

    /// Visible on a specific display
    pub fn on_display(display: DisplayKey) -> Self {
        Self {
            display: Some(display),
            ..Self::default()
        }
    }

    /// Visible inside a frame
    pub fn in_frame(frame: ObjectKey) -> Self {
        Self {
            frame: Some(frame),
            ..Self::default()
        }
    }

    /// Also request a display
    pub fn with_display(mut self, display: DisplayKey) -> Self {
        self.display = Some(display);
        self
    }

    /// Also request a frame
    pub fn with_frame(mut self, frame: ObjectKey) -> Self {
        self.frame = Some(frame);
        self
    }

    /// Start hidden
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Serializable description of a renderable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectTemplate {
    /// Optional name for lookup
    #[serde(default)]
    pub name: Option<String>,
    /// Shape parameters
    pub shape: ShapeTemplate,
    /// Local transform (identity by default)
    #[serde(default)]
    pub transform: Transform3D,
    /// Color; display foreground when unset (white for lights)
    #[serde(default)]
    pub color: Option<Color>,
    /// Opacity; 1.0 when unset. Not accepted by array objects.
    #[serde(default)]
    pub opacity: Option<f32>,
    /// Material; display material when unset
    #[serde(default)]
    pub material: Option<Material>,
}

impl ObjectTemplate {
    /// Create a template with only a shape
    pub fn new(shape: ShapeTemplate) -> Self {
        Self {
            name: None,
            shape,
            transform: Transform3D::identity(),
            color: None,
            opacity: None,
            material: None,
        }
    }

    /// Parse a template from RON
    pub fn from_ron(source: &str) -> Result<Self, ConfigurationError> {
        ron::from_str(source).map_err(|e| ConfigurationError::InvalidTemplate(e.to_string()))
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the transform
    pub fn with_transform(mut self, transform: Transform3D) -> Self {
        self.transform = transform;
        self
    }

    /// Set the color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the opacity
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Set the material
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    /// Check this template against the display it will live on
    pub fn check(&self, display: Option<&DisplaySettings>) -> Result<(), ConfigurationError> {
        let caps = self.shape.capabilities();
        if caps.contains(Capabilities::UNIFORM_AXIS) && display.is_some_and(|d| !d.uniform) {
            return Err(ConfigurationError::NonUniformDisplay { shape: self.shape.kind() });
        }
        if caps.contains(Capabilities::ARRAY_OBJECT) && self.opacity.is_some() {
            return Err(ConfigurationError::UnsupportedOption {
                shape: self.shape.kind(),
                option: "opacity",
            });
        }
        if let Some(opacity) = self.opacity {
            if !(0.0..=1.0).contains(&opacity) {
                return Err(ConfigurationError::InvalidTemplate(format!(
                    "opacity {} is outside 0..=1",
                    opacity
                )));
            }
        }
        Ok(())
    }

    /// Resolve the shape and appearance, filling unset options from the display
    pub(crate) fn resolve(self, display: Option<&DisplaySettings>) -> (ShapeTemplate, Appearance) {
        let foreground = display.map_or(color::WHITE, |d| d.foreground);
        let default_material = display.map_or(Material::Plain, |d| d.material);

        let default_color = if self.shape.capabilities().contains(Capabilities::LIGHT) {
            color::WHITE
        } else {
            foreground
        };

        let shape = match self.shape {
            ShapeTemplate::Label { text, linecolor, height } => ShapeTemplate::Label {
                text,
                linecolor: Some(linecolor.unwrap_or(foreground)),
                height,
            },
            other => other,
        };

        let appearance = Appearance {
            color: self.color.unwrap_or(default_color),
            opacity: self.opacity.unwrap_or(1.0),
            material: self.material.unwrap_or(default_material),
        };
        (shape, appearance)
    }
}
