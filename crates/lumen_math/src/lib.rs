//! Lumen math - vector types, rays and color helpers shared by every crate.

// Re-export glam for convenience
pub use glam::*;

mod color;
mod interval;
mod ray;

pub use color::{clamp_01, color_to_rgba, linear_to_gamma, linear_to_srgb, Color};
pub use interval::Interval;
pub use ray::Ray;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_color_is_componentwise() {
        let albedo = Color::new(0.5, 0.25, 1.0);
        let light = Color::new(2.0, 2.0, 0.5);
        assert_eq!(albedo * light, Color::new(1.0, 0.5, 0.5));
    }
}
