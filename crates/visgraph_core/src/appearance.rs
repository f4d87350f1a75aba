//! Material and Appearance types
//!
//! Appearance is opaque to the attachment logic: it is carried along so the
//! renderer can draw the object, and filled from display defaults at spawn time.

use serde::{Serialize, Deserialize};

/// RGB color, each component 0.0-1.0
pub type Color = [f32; 3];

/// Named colors
pub mod color {
    use super::Color;

    pub const WHITE: Color = [1.0, 1.0, 1.0];
    pub const BLACK: Color = [0.0, 0.0, 0.0];
    pub const RED: Color = [1.0, 0.0, 0.0];
    pub const GREEN: Color = [0.0, 1.0, 0.0];
    pub const BLUE: Color = [0.0, 0.0, 1.0];
    pub const YELLOW: Color = [1.0, 1.0, 0.0];
    pub const CYAN: Color = [0.0, 1.0, 1.0];
    pub const MAGENTA: Color = [1.0, 0.0, 1.0];
    pub const ORANGE: Color = [1.0, 0.6, 0.0];
}

/// Surface material, resolved by the renderer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    #[default]
    Plain,
    Diffuse,
    Rough,
    Shiny,
    Emissive,
    Wood,
    Marble,
    Plastic,
}

/// Visual properties of a renderable
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    /// Base color
    pub color: Color,
    /// Opacity (1.0 = opaque)
    pub opacity: f32,
    /// Surface material
    pub material: Material,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            color: color::WHITE,
            opacity: 1.0,
            material: Material::Plain,
        }
    }
}

impl Appearance {
    /// Create an opaque appearance with the given color and material
    pub fn new(color: Color, material: Material) -> Self {
        Self {
            color,
            opacity: 1.0,
            material,
        }
    }
}
