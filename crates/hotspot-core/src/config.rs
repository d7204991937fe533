//! Viewer configuration loading and validation
//!
//! Every section has defaults, so an empty file (or no file at all) yields
//! the stock viewer: dark grey background, camera at 45°/45° and distance 8,
//! `mesh.glb` lit by `environment.hdr`, and a green hotspot at the origin.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::color::Rgba;
use crate::fade::FadeTiming;
use crate::orbit::OrbitCamera;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Invalid config: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub lighting: LightingConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub materials: MaterialsConfig,
    #[serde(default)]
    pub hotspot: HotspotConfig,
    #[serde(default)]
    pub button: ButtonConfig,
}

/// Output surface settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Id of the canvas element the viewer renders into (web builds)
    #[serde(default = "default_canvas_id")]
    pub canvas_id: String,
    /// Window title (native builds)
    #[serde(default = "default_title")]
    pub title: String,
    /// Initial window size in logical pixels (native builds)
    #[serde(default = "default_window_size")]
    pub window_size: [u32; 2],
    #[serde(default = "default_clear_color")]
    pub clear_color: Rgba,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            canvas_id: default_canvas_id(),
            title: default_title(),
            window_size: default_window_size(),
            clear_color: default_clear_color(),
        }
    }
}

fn default_canvas_id() -> String {
    "renderCanvas".to_string()
}

fn default_title() -> String {
    "Hotspot Viewer".to_string()
}

fn default_window_size() -> [u32; 2] {
    [1280, 720]
}

fn default_clear_color() -> Rgba {
    Rgba::rgba(0.05, 0.05, 0.05, 1.0)
}

/// Orbit camera settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Horizontal angle in degrees
    #[serde(default = "default_angle")]
    pub azimuth_deg: f32,
    /// Angle down from the up axis in degrees
    #[serde(default = "default_angle")]
    pub elevation_deg: f32,
    #[serde(default = "default_distance")]
    pub distance: f32,
    #[serde(default)]
    pub target: Vec3,
    /// Radians per pixel of drag
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    #[serde(default = "default_zoom_speed")]
    pub zoom_speed: f32,
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            azimuth_deg: default_angle(),
            elevation_deg: default_angle(),
            distance: default_distance(),
            target: Vec3::ZERO,
            sensitivity: default_sensitivity(),
            zoom_speed: default_zoom_speed(),
            min_distance: default_min_distance(),
            max_distance: default_max_distance(),
        }
    }
}

fn default_angle() -> f32 {
    45.0
}

fn default_distance() -> f32 {
    8.0
}

fn default_sensitivity() -> f32 {
    0.005
}

fn default_zoom_speed() -> f32 {
    0.1
}

fn default_min_distance() -> f32 {
    0.5
}

fn default_max_distance() -> f32 {
    100.0
}

impl CameraConfig {
    /// Initial orbit camera state
    pub fn to_orbit(&self) -> OrbitCamera {
        let mut orbit = OrbitCamera {
            target: self.target,
            distance: self.distance,
            azimuth: self.azimuth_deg.to_radians(),
            elevation: self.elevation_deg.to_radians(),
            sensitivity: self.sensitivity,
            zoom_speed: self.zoom_speed,
            min_distance: self.min_distance,
            max_distance: self.max_distance,
        };
        // No-op rotation and scale pull both values inside their limits
        orbit.rotate(glam::Vec2::ZERO);
        orbit.scale_distance(1.0);
        orbit
    }
}

/// HDRI environment settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Equirectangular `.hdr` asset path
    #[serde(default = "default_environment_path")]
    pub path: String,
    /// Cubemap face size in texels
    #[serde(default = "default_environment_resolution")]
    pub resolution: u32,
    /// Environment light intensity
    #[serde(default = "default_environment_intensity")]
    pub intensity: f32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            path: default_environment_path(),
            resolution: default_environment_resolution(),
            intensity: default_environment_intensity(),
        }
    }
}

fn default_environment_path() -> String {
    "environment.hdr".to_string()
}

fn default_environment_resolution() -> u32 {
    128
}

fn default_environment_intensity() -> f32 {
    1000.0
}

/// Ambient light settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightingConfig {
    #[serde(default = "default_ambient_color")]
    pub ambient_color: Rgba,
    #[serde(default = "default_ambient_brightness")]
    pub ambient_brightness: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: default_ambient_color(),
            ambient_brightness: default_ambient_brightness(),
        }
    }
}

fn default_ambient_color() -> Rgba {
    Rgba::WHITE
}

fn default_ambient_brightness() -> f32 {
    400.0
}

/// Model asset settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// glTF / GLB asset path
    #[serde(default = "default_model_path")]
    pub path: String,
    /// Vertical position every loaded mesh is moved to
    #[serde(default)]
    pub vertical_position: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            vertical_position: 0.0,
        }
    }
}

fn default_model_path() -> String {
    "mesh.glb".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialsConfig {
    #[serde(default)]
    pub metallic: MetallicMaterialConfig,
    #[serde(default)]
    pub wireframe: WireframeMaterialConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetallicMaterialConfig {
    #[serde(default = "default_metallic")]
    pub metallic: f32,
    #[serde(default = "default_roughness")]
    pub roughness: f32,
    #[serde(default = "default_base_color")]
    pub base_color: Rgba,
}

impl Default for MetallicMaterialConfig {
    fn default() -> Self {
        Self {
            metallic: default_metallic(),
            roughness: default_roughness(),
            base_color: default_base_color(),
        }
    }
}

fn default_metallic() -> f32 {
    1.0
}

fn default_roughness() -> f32 {
    0.1
}

fn default_base_color() -> Rgba {
    Rgba::rgb(0.7, 0.9, 0.7)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireframeMaterialConfig {
    /// Line and emissive color
    #[serde(default = "default_wireframe_color")]
    pub color: Rgba,
}

impl Default for WireframeMaterialConfig {
    fn default() -> Self {
        Self {
            color: default_wireframe_color(),
        }
    }
}

fn default_wireframe_color() -> Rgba {
    Rgba::rgb(0.0, 0xcc as f32 / 255.0, 0x44 as f32 / 255.0)
}

/// Hotspot marker settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotspotConfig {
    /// World-space anchor
    #[serde(default)]
    pub anchor: Vec3,
    /// Marker diameter in logical pixels
    #[serde(default = "default_hotspot_size")]
    pub size: f32,
    /// Ring thickness in logical pixels
    #[serde(default = "default_hotspot_thickness")]
    pub thickness: f32,
    #[serde(default = "default_hotspot_ring_color")]
    pub ring_color: Rgba,
    #[serde(default = "default_hotspot_fill_color")]
    pub fill_color: Rgba,
    #[serde(default)]
    pub fade: FadeTiming,
}

impl Default for HotspotConfig {
    fn default() -> Self {
        Self {
            anchor: Vec3::ZERO,
            size: default_hotspot_size(),
            thickness: default_hotspot_thickness(),
            ring_color: default_hotspot_ring_color(),
            fill_color: default_hotspot_fill_color(),
            fade: FadeTiming::default(),
        }
    }
}

fn default_hotspot_size() -> f32 {
    20.0
}

fn default_hotspot_thickness() -> f32 {
    4.0
}

fn default_hotspot_ring_color() -> Rgba {
    Rgba::rgb(0.0, 1.0, 0.0)
}

fn default_hotspot_fill_color() -> Rgba {
    Rgba::rgb(0.0, 128.0 / 255.0, 0.0)
}

/// Material switch button settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButtonConfig {
    #[serde(default = "default_button_label")]
    pub label: String,
    #[serde(default = "default_button_size")]
    pub size: [f32; 2],
    #[serde(default = "default_button_text_color")]
    pub text_color: Rgba,
    #[serde(default = "default_button_background")]
    pub background: Rgba,
    /// Gap between the button and the bottom edge, as a percentage of the
    /// surface height
    #[serde(default = "default_button_bottom_offset")]
    pub bottom_offset_percent: f32,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            label: default_button_label(),
            size: default_button_size(),
            text_color: default_button_text_color(),
            background: default_button_background(),
            bottom_offset_percent: default_button_bottom_offset(),
        }
    }
}

fn default_button_label() -> String {
    "X-Ray".to_string()
}

fn default_button_size() -> [f32; 2] {
    [150.0, 40.0]
}

fn default_button_text_color() -> Rgba {
    Rgba::rgb(0.0, 1.0, 0.0)
}

fn default_button_background() -> Rgba {
    Rgba::BLACK
}

fn default_button_bottom_offset() -> f32 {
    10.0
}

impl ButtonConfig {
    /// Vertical gap to the bottom edge for a surface of `height` pixels
    pub fn bottom_offset(&self, height: f32) -> f32 {
        height * self.bottom_offset_percent / 100.0
    }
}

impl ViewerConfig {
    /// Parse a TOML document and validate it
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values the renderer cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::ValidationError(msg));

        if self.surface.canvas_id.trim().is_empty() {
            return invalid("surface.canvas_id must not be empty".to_string());
        }
        let camera = &self.camera;
        if !(camera.distance.is_finite() && camera.distance > 0.0) {
            return invalid(format!("camera.distance must be positive, got {}", camera.distance));
        }
        if !(camera.min_distance > 0.0 && camera.min_distance <= camera.max_distance) {
            return invalid(format!(
                "camera distance limits are inverted or non-positive: {}..{}",
                camera.min_distance, camera.max_distance
            ));
        }
        if !(camera.sensitivity.is_finite() && camera.sensitivity > 0.0) {
            return invalid(format!("camera.sensitivity must be positive, got {}", camera.sensitivity));
        }
        if !camera.target.is_finite() {
            return invalid("camera.target must be finite".to_string());
        }
        if self.environment.resolution == 0 {
            return invalid("environment.resolution must be non-zero".to_string());
        }
        if self.model.path.trim().is_empty() {
            return invalid("model.path must not be empty".to_string());
        }
        if !self.hotspot.anchor.is_finite() {
            return invalid("hotspot.anchor must be finite".to_string());
        }
        if !(self.hotspot.size > 0.0) {
            return invalid(format!("hotspot.size must be positive, got {}", self.hotspot.size));
        }
        if !(self.hotspot.fade.frames_per_second > 0.0) {
            return invalid("hotspot.fade.frames_per_second must be positive".to_string());
        }
        Ok(())
    }
}

/// Load configuration from file, falling back to defaults when it is missing
pub fn load_config(path: &Path) -> Result<ViewerConfig, ConfigError> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config = ViewerConfig::from_toml_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(ViewerConfig::default())
    }
}

/// Save default configuration to file
pub fn save_default_config(path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(&ViewerConfig::default())?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ViewerConfig::from_toml_str("").unwrap();
        assert_eq!(config.surface.canvas_id, "renderCanvas");
        assert_eq!(config.camera.distance, 8.0);
        assert_eq!(config.environment.resolution, 128);
        assert_eq!(config.model.path, "mesh.glb");
        assert_eq!(config.materials.metallic.roughness, 0.1);
        assert_eq!(config.materials.wireframe.color.to_rgba8(), [0x00, 0xcc, 0x44, 0xff]);
        assert_eq!(config.button.label, "X-Ray");
        assert_eq!(config.hotspot.fade.clip_frames, 30.0);
    }

    #[test]
    fn test_partial_sections() {
        let config = ViewerConfig::from_toml_str(
            r##"
            [camera]
            distance = 12.0

            [hotspot]
            anchor = [0.0, 1.5, 0.0]
            fill_color = "#ff0000"

            [hotspot.fade]
            clip_frames = 60.0
            "##,
        )
        .unwrap();

        assert_eq!(config.camera.distance, 12.0);
        assert_eq!(config.camera.azimuth_deg, 45.0);
        assert_eq!(config.hotspot.anchor, Vec3::new(0.0, 1.5, 0.0));
        assert_eq!(config.hotspot.fill_color, Rgba::rgb(1.0, 0.0, 0.0));
        assert_eq!(config.hotspot.fade.clip_frames, 60.0);
        assert_eq!(config.hotspot.fade.frames_per_second, 60.0);
    }

    #[test]
    fn test_camera_to_orbit() {
        let orbit = CameraConfig::default().to_orbit();
        assert!((orbit.azimuth - 45f32.to_radians()).abs() < 1e-5);
        assert!((orbit.elevation - 45f32.to_radians()).abs() < 1e-5);
        assert_eq!(orbit.distance, 8.0);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let err = ViewerConfig::from_toml_str("[camera]\ndistance = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = ViewerConfig::from_toml_str("[environment]\nresolution = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = ViewerConfig::from_toml_str("[button]\ntext_color = \"mauve\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config(&temp_dir.path().join("viewer.toml")).unwrap();
        assert_eq!(config.surface.title, "Hotspot Viewer");
    }

    #[test]
    fn test_save_and_load_default_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("viewer.toml");

        save_default_config(&path).unwrap();
        let config = load_config(&path).unwrap();

        let defaults = ViewerConfig::default();
        assert_eq!(config.surface.clear_color, defaults.surface.clear_color);
        assert_eq!(config.hotspot.ring_color, defaults.hotspot.ring_color);
        assert_eq!(config.button.size, defaults.button.size);
    }
}
