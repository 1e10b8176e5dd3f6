//! Bounce sampling for the roughness/metallic material model.

use lumen_core::Material;
use lumen_math::Vec3;

use crate::sampler::PixelSampler;
use crate::HitRecord;

/// Pick the direction of the next bounce.
///
/// With probability `metallic` the specular lobe is taken: the mirror
/// direction perturbed by `roughness`. Otherwise a cosine-weighted diffuse
/// direction is blended towards the mirror direction by `1 - roughness`,
/// so roughness 0 is a mirror and roughness 1 is fully diffuse.
///
/// The result is unit length, or zero when the sample degenerates; callers
/// treat a zero direction as the end of the path.
pub fn scatter(incoming: Vec3, rec: &HitRecord, material: &Material, sampler: &mut PixelSampler) -> Vec3 {
    let mirror = reflect(incoming.normalize_or_zero(), rec.normal);

    if sampler.next_f32() < material.metallic {
        let fuzzed = mirror + material.roughness * sampler.unit_vector();
        into_hemisphere(fuzzed, rec.normal).normalize_or_zero()
    } else {
        let diffuse = cosine_direction(rec.normal, sampler);
        mirror.lerp(diffuse, material.roughness).normalize_or_zero()
    }
}

/// Cosine-weighted direction about `normal`.
fn cosine_direction(normal: Vec3, sampler: &mut PixelSampler) -> Vec3 {
    let mut direction = normal + sampler.unit_vector();

    // Catch degenerate scatter direction
    if direction.length_squared() < 1e-8 {
        direction = normal;
    }

    direction.normalize()
}

/// Fold a direction that points below the surface back above it.
#[inline]
fn into_hemisphere(direction: Vec3, normal: Vec3) -> Vec3 {
    let below = direction.dot(normal);
    if below < 0.0 {
        direction - 2.0 * below * normal
    } else {
        direction
    }
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}
