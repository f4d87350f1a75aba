//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`VG_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

use visgraph_core::{Color, DisplaySettings, Material};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Display configuration
    #[serde(default)]
    pub display: DisplayConfig,
    /// Demo scene configuration
    #[serde(default)]
    pub demo: DemoConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`VG_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // VG_DISPLAY__TITLE=Test -> display.title = "Test"
        figment = figment.merge(Env::prefixed("VG_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Window title
    pub title: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Whether all axes share one scale
    pub uniform: bool,
    /// Default object color
    pub foreground: Color,
    /// Background color
    pub background: Color,
    /// Default object material
    pub material: Material,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "visgraph".to_string(),
            width: 800,
            height: 600,
            uniform: true,
            foreground: [1.0, 1.0, 1.0],
            background: [0.0, 0.0, 0.0],
            material: Material::Plain,
        }
    }
}

impl DisplayConfig {
    /// Convert to the settings a scene graph display is created with
    pub fn to_display_settings(&self) -> DisplaySettings {
        DisplaySettings {
            title: self.title.clone(),
            uniform: self.uniform,
            foreground: self.foreground,
            background: self.background,
            material: self.material,
        }
    }
}

/// Demo scene configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of ticks to run
    pub ticks: u32,
    /// Hub rotation per tick, in radians
    pub spin_rate: f32,
    /// Number of spheres orbiting the hub
    pub orbiters: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            ticks: 240,
            spin_rate: 0.05,
            orbiters: 4,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Audit the scene graph after every tick
    pub validate_each_tick: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            validate_each_tick: false,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.display.width, 800);
        assert!(config.display.uniform);
        assert_eq!(config.demo.orbiters, 4);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("title"));
        assert!(toml.contains("spin_rate"));
        assert!(toml.contains("material = \"plain\""));
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let config: AppConfig = toml::from_str(
            "[display]\ntitle = \"partial\"\nmaterial = \"wood\"\n\n[demo]\nticks = 3\n",
        )
        .unwrap();
        assert_eq!(config.display.title, "partial");
        assert_eq!(config.display.material, Material::Wood);
        assert_eq!(config.display.height, 600);
        assert_eq!(config.demo.ticks, 3);
        assert_eq!(config.demo.orbiters, 4);
    }

    #[test]
    fn test_to_display_settings() {
        let display = DisplayConfig {
            uniform: false,
            foreground: [0.5, 0.5, 0.5],
            ..DisplayConfig::default()
        };
        let settings = display.to_display_settings();
        assert_eq!(settings.title, "visgraph");
        assert!(!settings.uniform);
        assert_eq!(settings.foreground, [0.5, 0.5, 0.5]);
        assert_eq!(settings.material, Material::Plain);
    }

    #[test]
    fn test_load_from_missing_dir_gives_defaults() {
        let config = AppConfig::load_from("does/not/exist").unwrap();
        assert_eq!(config.demo.ticks, DemoConfig::default().ticks);
    }
}
