//! Per-frame hotspot tracking: projection, occlusion and fading

use bevy::prelude::*;
use bevy_picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings};
use hotspot_core::{FadeAnimation, HotspotMarker, PickingInfo, Ray, SceneQuery, is_occluded};

use crate::app::ViewerSettings;
use crate::camera::{MainCamera, update_camera};
use crate::models::ViewerState;

pub struct HotspotPlugin;

impl Plugin for HotspotPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, update_hotspot.after(update_camera));
    }
}

/// Screen-space hotspot: marker state plus the running fade
#[derive(Component, Debug)]
pub struct HotspotOverlay {
    pub marker: HotspotMarker,
    fade: Option<FadeAnimation>,
    alpha: f32,
}

impl HotspotOverlay {
    pub fn new(marker: HotspotMarker) -> Self {
        Self {
            marker,
            fade: None,
            alpha: 1.0,
        }
    }

    /// Current opacity in `0.0..=1.0`
    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

/// Nearest-hit queries against every pickable mesh in the scene
struct MeshScene<'a, 'w, 's> {
    ray_cast: &'a mut MeshRayCast<'w, 's>,
}

impl SceneQuery for MeshScene<'_, '_, '_> {
    type Entity = Entity;

    fn pick_with_ray(&mut self, ray: &Ray) -> PickingInfo<Entity> {
        let Some(ray) = scene_ray(ray) else {
            return PickingInfo::miss();
        };
        let hits = self.ray_cast.cast_ray(ray, &MeshRayCastSettings::default());
        nearest_hit(hits.iter().map(|(entity, hit)| (*entity, hit.distance)))
    }
}

/// Bevy ray for an occlusion query, `None` when the direction is unusable
fn scene_ray(ray: &Ray) -> Option<Ray3d> {
    let direction = Dir3::new(ray.direction).ok()?;
    Some(Ray3d::new(ray.origin, direction))
}

/// Closest finite hit, or a miss
fn nearest_hit(hits: impl IntoIterator<Item = (Entity, f32)>) -> PickingInfo<Entity> {
    hits.into_iter()
        .filter(|(_, distance)| distance.is_finite())
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or_else(PickingInfo::miss, |(entity, distance)| PickingInfo::hit(entity, distance))
}

fn update_hotspot(
    mut overlays: Query<&mut HotspotOverlay>,
    camera_query: Query<(&Camera, &Transform), With<MainCamera>>,
    state: Res<ViewerState>,
    settings: Res<ViewerSettings>,
    mut ray_cast: MeshRayCast,
    time: Res<Time>,
) {
    let Ok((camera, camera_transform)) = camera_query.single() else { return };
    // The camera has no parent; use this frame's transform rather than last
    // frame's propagated one
    let camera_global = GlobalTransform::from(*camera_transform);
    let viewpoint = camera_transform.translation;
    let material = state.material();

    for mut overlay in overlays.iter_mut() {
        let anchor = overlay.marker.anchor();
        let projected = camera.world_to_viewport(&camera_global, anchor).ok();

        let update = overlay.marker.update(material, projected, || {
            is_occluded(anchor, viewpoint, &mut MeshScene { ray_cast: &mut ray_cast })
        });

        if let Some(fade) = update.fade {
            tracing::debug!(?fade, "Hotspot fade");
            overlay.fade = Some(FadeAnimation::start(fade, settings.hotspot.fade));
        }

        if let Some(fade) = overlay.fade.as_mut() {
            let alpha = fade.advance(time.delta_secs());
            overlay.alpha = alpha;
        }
    }
}
