use crate::Vec3;

/// A ray in 3D space with an origin and a direction.
///
/// The tracer always hands out unit-length directions, but nothing here
/// enforces it; `at` is linear in `direction` either way.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// True when the direction can still be traced: finite and not collapsed
    /// to zero length.
    #[inline]
    pub fn is_traceable(&self) -> bool {
        self.direction.is_finite() && self.direction.length_squared() > 1e-12
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_offset_origin() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert_eq!(ray.at(5.0), Vec3::ZERO);
    }

    #[test]
    fn test_traceable() {
        assert!(Ray::new(Vec3::ZERO, Vec3::Y).is_traceable());
        assert!(!Ray::new(Vec3::ZERO, Vec3::ZERO).is_traceable());
        assert!(!Ray::new(Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 1.0)).is_traceable());
        assert!(!Ray::new(Vec3::ZERO, Vec3::new(f32::INFINITY, 0.0, 0.0)).is_traceable());
    }
}
