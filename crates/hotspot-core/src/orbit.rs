//! Orbit camera math (Y-up, target-centred)

use glam::{Vec2, Vec3};

const MIN_ELEVATION: f32 = 0.01;
const MAX_ELEVATION: f32 = std::f32::consts::PI - 0.01;

/// Orbit camera around a fixed target. Panning is not supported.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    /// Point the camera orbits around
    pub target: Vec3,
    /// Distance from target
    pub distance: f32,
    /// Rotation around the Y axis in radians, measured from +X toward +Z
    pub azimuth: f32,
    /// Angle down from the +Y axis in radians
    pub elevation: f32,
    /// Radians per pixel of drag
    pub sensitivity: f32,
    /// Fraction of the distance removed per scroll line
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 8.0,
            azimuth: 45f32.to_radians(),
            elevation: 45f32.to_radians(),
            sensitivity: 0.005,
            zoom_speed: 0.1,
            min_distance: 0.5,
            max_distance: 100.0,
        }
    }
}

impl OrbitCamera {
    /// World-space camera position
    pub fn position(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        self.target + self.distance * Vec3::new(cos_az * sin_el, cos_el, sin_az * sin_el)
    }

    /// Rotate by a pointer drag delta in pixels
    pub fn rotate(&mut self, delta: Vec2) {
        self.azimuth -= delta.x * self.sensitivity;
        self.elevation =
            (self.elevation - delta.y * self.sensitivity).clamp(MIN_ELEVATION, MAX_ELEVATION);
    }

    /// Zoom by scroll lines (positive = closer)
    pub fn zoom(&mut self, lines: f32) {
        // A big enough flick would scale by zero or less; pin it to the near limit instead
        self.scale_distance((1.0 - lines * self.zoom_speed).max(f32::EPSILON));
    }

    /// Multiply the distance by `factor`, respecting the limits
    pub fn scale_distance(&mut self, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
    }
}
