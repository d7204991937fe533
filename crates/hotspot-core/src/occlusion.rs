//! Line-of-sight testing between the camera and a world-space point
//!
//! The test itself is engine-independent: it builds a ray and hands it to a
//! [`SceneQuery`], which the viewer implements on top of the engine's mesh
//! ray casting.

use glam::Vec3;

/// A ray with an origin and a normalized direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Ray from `origin` pointing at `target`.
    ///
    /// Returns `None` when the two points coincide or either is not finite,
    /// since no direction can be derived.
    pub fn toward(origin: Vec3, target: Vec3) -> Option<Self> {
        if !origin.is_finite() || !target.is_finite() {
            return None;
        }
        let direction = (target - origin).try_normalize()?;
        Some(Self { origin, direction })
    }
}

/// Result of a scene pick, shaped like the engine's picking info
#[derive(Debug, Clone, PartialEq)]
pub struct PickingInfo<E> {
    /// Whether anything was intersected
    pub hit: bool,
    /// The intersected entity, if the engine could resolve one
    pub picked: Option<E>,
    /// Distance from the ray origin to the nearest intersection
    pub distance: f32,
}

impl<E> PickingInfo<E> {
    /// No intersection
    pub fn miss() -> Self {
        Self {
            hit: false,
            picked: None,
            distance: f32::INFINITY,
        }
    }

    /// Nearest intersection with `entity` at `distance`
    pub fn hit(entity: E, distance: f32) -> Self {
        Self {
            hit: true,
            picked: Some(entity),
            distance,
        }
    }
}

/// Scene-wide nearest-hit ray query
pub trait SceneQuery {
    type Entity;

    /// Return the nearest intersection along `ray`, or a miss.
    ///
    /// An empty or not-yet-populated scene must report a miss.
    fn pick_with_ray(&mut self, ray: &Ray) -> PickingInfo<Self::Entity>;
}

/// Whether `point` is hidden from `viewpoint` by scene geometry.
///
/// Any intersection along the ray counts, including geometry that lies
/// beyond `point`. The ray is not clipped at the anchor distance.
pub fn is_occluded<Q: SceneQuery>(point: Vec3, viewpoint: Vec3, scene: &mut Q) -> bool {
    let Some(ray) = Ray::toward(viewpoint, point) else {
        tracing::trace!(?point, ?viewpoint, "Degenerate occlusion ray, treating as visible");
        return false;
    };

    let info = scene.pick_with_ray(&ray);
    if info.hit {
        tracing::trace!(distance = info.distance, resolved = info.picked.is_some(), "Occlusion ray hit");
    }
    info.hit && info.picked.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Analytic test scene made of spheres
    #[derive(Default)]
    struct SphereScene {
        spheres: Vec<(u32, Vec3, f32)>,
        queries: usize,
    }

    impl SphereScene {
        fn with(mut self, id: u32, center: Vec3, radius: f32) -> Self {
            self.spheres.push((id, center, radius));
            self
        }
    }

    fn intersect_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
        let oc = ray.origin - center;
        let b = oc.dot(ray.direction);
        let c = oc.dot(oc) - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_disc = discriminant.sqrt();
        let t1 = -b - sqrt_disc;
        let t2 = -b + sqrt_disc;
        if t1 > 0.0 {
            Some(t1)
        } else if t2 > 0.0 {
            Some(t2)
        } else {
            None
        }
    }

    impl SceneQuery for SphereScene {
        type Entity = u32;

        fn pick_with_ray(&mut self, ray: &Ray) -> PickingInfo<u32> {
            self.queries += 1;
            self.spheres
                .iter()
                .filter_map(|(id, center, radius)| {
                    intersect_sphere(ray, *center, *radius).map(|t| (*id, t))
                })
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(id, t)| PickingInfo::hit(id, t))
                .unwrap_or_else(PickingInfo::miss)
        }
    }

    /// Scene whose engine reports a hit but cannot resolve the entity
    struct UnresolvedHitScene;

    impl SceneQuery for UnresolvedHitScene {
        type Entity = u32;

        fn pick_with_ray(&mut self, _ray: &Ray) -> PickingInfo<u32> {
            PickingInfo {
                hit: true,
                picked: None,
                distance: 1.0,
            }
        }
    }

    const CAMERA: Vec3 = Vec3::new(0.0, 0.0, 10.0);

    #[test]
    fn test_empty_scene_is_not_occluded() {
        let mut scene = SphereScene::default();
        assert!(!is_occluded(Vec3::ZERO, CAMERA, &mut scene));
        assert_eq!(scene.queries, 1);
    }

    #[test]
    fn test_blocker_in_front_occludes() {
        let mut scene = SphereScene::default().with(1, Vec3::new(0.0, 0.0, 5.0), 1.0);
        assert!(is_occluded(Vec3::ZERO, CAMERA, &mut scene));
    }

    #[test]
    fn test_blocker_behind_point_still_occludes() {
        // Any hit counts, even past the anchor
        let mut scene = SphereScene::default().with(1, Vec3::new(0.0, 0.0, -5.0), 1.0);
        assert!(is_occluded(Vec3::ZERO, CAMERA, &mut scene));
    }

    #[test]
    fn test_blocker_off_axis_does_not_occlude() {
        let mut scene = SphereScene::default().with(1, Vec3::new(4.0, 0.0, 5.0), 1.0);
        assert!(!is_occluded(Vec3::ZERO, CAMERA, &mut scene));
    }

    #[test]
    fn test_hit_without_entity_is_not_occluded() {
        assert!(!is_occluded(Vec3::ZERO, CAMERA, &mut UnresolvedHitScene));
    }

    #[test]
    fn test_degenerate_ray_skips_query() {
        let mut scene = SphereScene::default().with(1, Vec3::ZERO, 1.0);
        assert!(!is_occluded(CAMERA, CAMERA, &mut scene));
        assert!(!is_occluded(Vec3::splat(f32::NAN), CAMERA, &mut scene));
        assert_eq!(scene.queries, 0);
    }

    #[test]
    fn test_ray_toward() {
        let ray = Ray::toward(CAMERA, Vec3::ZERO).unwrap();
        assert_eq!(ray.direction, Vec3::NEG_Z);
        assert_eq!(ray.origin, CAMERA);
    }
}
