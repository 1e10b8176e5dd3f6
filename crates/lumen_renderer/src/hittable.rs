//! Ray-sphere intersection and the hit record.

use lumen_core::{Scene, Sphere};
use lumen_math::{Interval, Ray, Vec3};

/// Record of a ray-sphere intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Distance along the ray (nearest positive root)
    pub distance: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
    /// Index of the sphere in `Scene::spheres`
    pub sphere_index: usize,
}

impl HitRecord {
    /// Build a record, orienting the normal against the incoming ray.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn new(ray: &Ray, distance: f32, outward_normal: Vec3, sphere_index: usize) -> Self {
        let front_face = ray.direction.dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Self {
            distance,
            point: ray.at(distance),
            normal,
            front_face,
            sphere_index,
        }
    }
}

/// Solve |O + tD - C|^2 = r^2 and return the nearest root inside `ray_t`.
///
/// Returns the smaller root if it lies in the interval, otherwise the
/// larger one, otherwise `None` (both outside, or complex roots).
pub fn hit_sphere(ray: &Ray, sphere: &Sphere, ray_t: Interval) -> Option<f32> {
    let oc = sphere.center - ray.origin;
    let a = ray.direction.length_squared();
    let h = ray.direction.dot(oc);
    let c = oc.length_squared() - sphere.radius * sphere.radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 || a == 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    // Find the nearest root in the acceptable range
    let near = (h - sqrtd) / a;
    if ray_t.surrounds(near) {
        return Some(near);
    }
    let far = (h + sqrtd) / a;
    ray_t.surrounds(far).then_some(far)
}

/// Find the closest positive hit among all renderable spheres.
///
/// Spheres with a non-positive radius are skipped as if absent.
pub fn trace_ray(ray: &Ray, scene: &Scene) -> Option<HitRecord> {
    let mut closest: Option<(usize, f32)> = None;
    let mut ray_t = Interval::POSITIVE;

    for (index, sphere) in scene.spheres.iter().enumerate() {
        if !sphere.is_renderable() {
            continue;
        }
        if let Some(distance) = hit_sphere(ray, sphere, ray_t) {
            closest = Some((index, distance));
            ray_t = ray_t.with_max(distance);
        }
    }

    closest.map(|(index, distance)| {
        let sphere = &scene.spheres[index];
        let outward_normal = (ray.at(distance) - sphere.center) / sphere.radius;
        HitRecord::new(ray, distance, outward_normal.normalize(), index)
    })
}
