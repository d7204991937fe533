//! Orbit camera: left drag or one-finger drag orbits, wheel or pinch zooms

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use hotspot_core::OrbitCamera;

use crate::app::ViewerSettings;

/// Pixel-mode scroll deltas per scroll line
const PIXELS_PER_LINE: f32 = 100.0;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera)
            .add_systems(Update, update_camera);
    }
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Orbit state driving the main camera
#[derive(Resource, Debug, Clone, Deref, DerefMut)]
pub struct CameraSettings(pub OrbitCamera);

fn setup_camera(mut commands: Commands, settings: Res<ViewerSettings>) {
    let orbit = settings.camera.to_orbit();

    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(orbit.position()).looking_at(orbit.target, Vec3::Y),
        MainCamera,
    ));

    tracing::debug!(
        distance = orbit.distance,
        azimuth = orbit.azimuth,
        elevation = orbit.elevation,
        "Camera spawned"
    );
    commands.insert_resource(CameraSettings(orbit));
}

pub fn update_camera(
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut settings: ResMut<CameraSettings>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    mut contexts: bevy_egui::EguiContexts,
) {
    // Pointer over the overlay (the X-Ray button) belongs to the UI
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area())
        .unwrap_or(false);

    let total_motion: Vec2 = mouse_motion.read().map(|motion| motion.delta).sum();
    let scroll_lines: f32 = mouse_wheel
        .read()
        .map(|scroll| match scroll.unit {
            MouseScrollUnit::Line => scroll.y,
            MouseScrollUnit::Pixel => scroll.y / PIXELS_PER_LINE,
        })
        .sum();

    if !egui_wants_pointer {
        if mouse_button.pressed(MouseButton::Left) {
            settings.rotate(total_motion);
        }
        if scroll_lines != 0.0 {
            settings.zoom(scroll_lines);
        }
    }

    let touches: Vec<_> = touch_input.iter().collect();
    match touches.as_slice() {
        [touch] if !egui_wants_pointer => {
            settings.rotate(touch.delta());
        }
        // Pinch to zoom
        [t1, t2] => {
            let curr_dist = t1.position().distance(t2.position());
            let prev_dist = (t1.position() - t1.delta()).distance(t2.position() - t2.delta());
            settings.scale_distance(prev_dist / curr_dist.max(1.0));
        }
        _ => {}
    }

    if let Ok(mut transform) = camera_query.single_mut() {
        transform.translation = settings.position();
        transform.look_at(settings.target, Vec3::Y);
    }
}
