//! Display (viewport) membership
//!
//! A Display is created by the caller and owns the ordered set of root-level
//! renderables: visible objects that are not inside a frame. Only the
//! [`SceneGraph`](crate::SceneGraph) changes that set.

use serde::{Serialize, Deserialize};
use slotmap::new_key_type;

use crate::appearance::{color, Color, Material};
use crate::object::ObjectKey;

new_key_type! {
    /// Key to a display in the scene graph
    ///
    /// Generational: a key to a removed display never aliases a newer one.
    pub struct DisplayKey;
}

/// Settings of a display, including the defaults handed to new objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Window title
    pub title: String,
    /// Whether all three axes share one scale
    ///
    /// Shapes with a uniform-axis requirement refuse non-uniform displays.
    pub uniform: bool,
    /// Default color for new objects
    pub foreground: Color,
    /// Background color
    pub background: Color,
    /// Default material for new objects
    pub material: Material,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            title: "visgraph".to_string(),
            uniform: true,
            foreground: color::WHITE,
            background: color::BLACK,
            material: Material::Plain,
        }
    }
}

impl DisplaySettings {
    /// Create settings with the given title and default everything else
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set whether the axes are uniform
    pub fn with_uniform(mut self, uniform: bool) -> Self {
        self.uniform = uniform;
        self
    }

    /// Set the default foreground color
    pub fn with_foreground(mut self, foreground: Color) -> Self {
        self.foreground = foreground;
        self
    }

    /// Set the default material
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }
}

/// A viewport and its root-level draw set
#[derive(Debug, Clone)]
pub struct Display {
    /// Display settings
    pub settings: DisplaySettings,
    roots: Vec<ObjectKey>,
}

impl Display {
    /// Create a display with no roots
    pub fn new(settings: DisplaySettings) -> Self {
        Self {
            settings,
            roots: Vec::new(),
        }
    }

    /// Root-level objects in draw order
    pub fn roots(&self) -> &[ObjectKey] {
        &self.roots
    }

    /// Check whether `key` is a root of this display
    pub fn contains_root(&self, key: ObjectKey) -> bool {
        self.roots.contains(&key)
    }

    /// Add a root; returns false if it was already present
    pub(crate) fn add_root(&mut self, key: ObjectKey) -> bool {
        if self.roots.contains(&key) {
            return false;
        }
        self.roots.push(key);
        true
    }

    /// Remove a root; returns false if it was not present
    pub(crate) fn remove_root(&mut self, key: ObjectKey) -> bool {
        let before = self.roots.len();
        self.roots.retain(|&k| k != key);
        self.roots.len() != before
    }
}
