use crate::error::ConfigError;
use crate::overlay::FogPalette;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub vision: VisionConfig,
    #[serde(default)]
    pub palette: FogPalette,
    #[serde(default)]
    pub walk: WalkConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    #[serde(default = "default_obstacle_density")]
    pub obstacle_density: f64,
    #[serde(default = "default_map_seed")]
    pub seed: u64,
    #[serde(default = "default_safe_zone_radius")]
    pub safe_zone_radius: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisionConfig {
    #[serde(default = "default_sight_range")]
    pub sight_range: u32,
    #[serde(default = "default_ray_count")]
    pub ray_count: u32,
}

/// Settings for the headless random-walk driver
#[derive(Debug, Clone, Deserialize)]
pub struct WalkConfig {
    #[serde(default = "default_steps")]
    pub steps: u32,
    #[serde(default = "default_walk_seed")]
    pub seed: u64,
    /// Reset exploration every N steps; 0 never resets
    #[serde(default)]
    pub reset_every: u32,
    #[serde(default = "default_contacts")]
    pub contacts: usize,
}

// Default values
fn default_width() -> i32 { 40 }
fn default_height() -> i32 { 40 }
fn default_obstacle_density() -> f64 { 0.2 }
fn default_map_seed() -> u64 { 42 }
fn default_safe_zone_radius() -> i32 { crate::grid::SAFE_ZONE_RADIUS }
fn default_sight_range() -> u32 { 8 }
fn default_ray_count() -> u32 { crate::ray::DEFAULT_RAY_COUNT }
fn default_steps() -> u32 { 200 }
fn default_walk_seed() -> u64 { 7 }
fn default_contacts() -> usize { 5 }

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            obstacle_density: default_obstacle_density(),
            seed: default_map_seed(),
            safe_zone_radius: default_safe_zone_radius(),
        }
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            sight_range: default_sight_range(),
            ray_count: default_ray_count(),
        }
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            seed: default_walk_seed(),
            reset_every: 0,
            contacts: default_contacts(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            vision: VisionConfig::default(),
            palette: FogPalette::default(),
            walk: WalkConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from config.toml, or use defaults if it is
    /// missing, unparseable or invalid
    pub fn load() -> Self {
        let path = Path::new("config.toml");
        if !path.exists() {
            info!("no config.toml found, using default configuration");
            return Config::default();
        }

        match Config::from_path(path) {
            Ok(config) => {
                info!("loaded configuration from config.toml");
                config
            }
            Err(e) => {
                warn!("{}; using default configuration", e);
                Config::default()
            }
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Config::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map.width <= 0 || self.map.height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "map dimensions must be positive, got {}x{}",
                self.map.width, self.map.height
            )));
        }
        if !(0.0..=1.0).contains(&self.map.obstacle_density) {
            return Err(ConfigError::Invalid(format!(
                "obstacle_density must be within [0, 1], got {}",
                self.map.obstacle_density
            )));
        }
        if self.map.safe_zone_radius < 0 {
            return Err(ConfigError::Invalid(format!(
                "safe_zone_radius must not be negative, got {}",
                self.map.safe_zone_radius
            )));
        }
        if self.vision.ray_count == 0 {
            return Err(ConfigError::Invalid("ray_count must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.map.width, 40);
        assert_eq!(config.map.height, 40);
        assert_eq!(config.map.safe_zone_radius, 2);
        assert_eq!(config.vision.sight_range, 8);
        assert_eq!(config.vision.ray_count, 180);
        assert_eq!(config.palette, FogPalette::default());
        assert_eq!(config.walk.reset_every, 0);
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml(
            r#"
            [map]
            width = 12
            obstacle_density = 0.5

            [vision]
            ray_count = 360

            [palette]
            dimmed = [1, 2, 3, 4]
            "#,
        )
        .unwrap();
        assert_eq!(config.map.width, 12);
        assert_eq!(config.map.height, 40);
        assert_eq!(config.map.obstacle_density, 0.5);
        assert_eq!(config.vision.ray_count, 360);
        assert_eq!(config.vision.sight_range, 8);
        assert_eq!(config.palette.dimmed, [1, 2, 3, 4]);
        assert_eq!(config.palette.hidden, [20, 20, 30, 255]);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            Config::from_toml("[vision]\nray_count = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml("[map]\nwidth = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml("[map]\nobstacle_density = 1.5"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml("[map]\nwidth = \"wide\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::from_path("does/not/exist.toml"),
            Err(ConfigError::Read { .. })
        ));
    }
}
