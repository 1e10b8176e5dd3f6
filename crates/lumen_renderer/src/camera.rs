//! Pinhole camera with a cached per-pixel ray direction table.

use lumen_math::{Mat4, Quat, Vec2, Vec3, Vec4};
use rayon::prelude::*;

/// What the renderer needs from a camera.
///
/// All rays of a pinhole camera share one origin; directions come from a
/// precomputed table with one unit vector per pixel, row-major.
pub trait RayCamera: Sync {
    /// Shared origin of every primary ray.
    fn origin(&self) -> Vec3;

    /// One direction per pixel, `width * height` entries.
    fn ray_directions(&self) -> &[Vec3];

    /// Viewport (width, height) the table was built for.
    fn viewport(&self) -> (u32, u32);
}

/// Snapshot of user input for one camera update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Mouse movement since the last update, in pixels
    pub mouse_delta: Vec2,
    /// Mouse-look is engaged (e.g. right button held); nothing moves otherwise
    pub look_active: bool,
}

/// Tables at least this large are rebuilt on the rayon pool.
const PARALLEL_TABLE_THRESHOLD: usize = 4096;

/// Up vector for the view basis. World +Y, or +Z when looking straight up or
/// down, where +Y would leave the basis undefined.
fn view_up(forward: Vec3) -> Vec3 {
    if forward.cross(Vec3::Y).length_squared() < 1e-8 {
        Vec3::Z
    } else {
        Vec3::Y
    }
}

/// Pinhole camera.
#[derive(Debug, Clone)]
pub struct Camera {
    vertical_fov: f32, // degrees
    near: f32,
    far: f32,

    position: Vec3,
    forward: Vec3,

    inverse_projection: Mat4,
    inverse_view: Mat4,

    ray_directions: Vec<Vec3>,
    viewport: (u32, u32),

    projection_dirty: bool,
    view_dirty: bool,
}

impl Camera {
    /// Create a camera at (0, 0, 6) looking down -Z with an empty viewport.
    pub fn new(vertical_fov: f32, near: f32, far: f32) -> Self {
        Self {
            vertical_fov,
            near,
            far,
            position: Vec3::new(0.0, 0.0, 6.0),
            forward: Vec3::NEG_Z,
            inverse_projection: Mat4::IDENTITY,
            inverse_view: Mat4::IDENTITY,
            ray_directions: Vec::new(),
            viewport: (0, 0),
            projection_dirty: true,
            view_dirty: true,
        }
    }

    /// Set camera position.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.set_position(position);
        self
    }

    /// Point the camera at a target.
    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.set_forward(target - self.position);
        self
    }

    /// Set viewport size.
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.resize(width, height);
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn vertical_fov(&self) -> f32 {
        self.vertical_fov
    }

    pub fn rotation_speed(&self) -> f32 {
        0.3
    }

    pub fn movement_speed(&self) -> f32 {
        5.0
    }

    pub fn set_position(&mut self, position: Vec3) {
        if position != self.position {
            self.position = position;
            self.view_dirty = true;
            self.refresh();
        }
    }

    /// Set the view direction. Zero or non-finite directions are ignored.
    pub fn set_forward(&mut self, forward: Vec3) {
        let forward = forward.normalize_or_zero();
        if forward != Vec3::ZERO && forward != self.forward {
            self.forward = forward;
            self.view_dirty = true;
            self.refresh();
        }
    }

    pub fn set_vertical_fov(&mut self, degrees: f32) {
        if degrees != self.vertical_fov {
            self.vertical_fov = degrees;
            self.projection_dirty = true;
            self.refresh();
        }
    }

    /// Rebuild projection and ray table for new viewport dimensions.
    /// No-op when the size is unchanged.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == self.viewport && !self.ray_directions.is_empty() {
            return;
        }

        self.viewport = (width, height);
        self.projection_dirty = true;
        self.refresh();
    }

    /// Apply one step of fly-camera input.
    ///
    /// Returns true when position or orientation actually changed, which is
    /// the caller's cue to reset accumulation.
    pub fn update(&mut self, input: &CameraInput, time_step: f32) -> bool {
        if !input.look_active {
            return false;
        }

        let time_step = time_step.clamp(0.0, 1.0 / 60.0);
        let up = Vec3::Y;
        let right = self.forward.cross(view_up(self.forward)).normalize_or_zero();
        let speed = self.movement_speed() * time_step;
        let mut moved = false;

        let steps = [
            (input.forward, self.forward),
            (input.back, -self.forward),
            (input.right, right),
            (input.left, -right),
            (input.up, up),
            (input.down, -up),
        ];
        for (pressed, direction) in steps {
            if pressed && speed > 0.0 && direction != Vec3::ZERO {
                self.position += direction * speed;
                moved = true;
            }
        }

        let delta = input.mouse_delta * 0.002;
        if delta != Vec2::ZERO && right != Vec3::ZERO {
            let pitch_delta = delta.y * self.rotation_speed();
            let yaw_delta = delta.x * self.rotation_speed();

            let rotation = (Quat::from_axis_angle(right, -pitch_delta)
                * Quat::from_axis_angle(up, -yaw_delta))
            .normalize();
            self.forward = (rotation * self.forward).normalize();
            moved = true;
        }

        if moved {
            self.view_dirty = true;
            self.refresh();
        }

        moved
    }

    /// Recompute whatever the dirty flags say is stale.
    fn refresh(&mut self) {
        if !self.projection_dirty && !self.view_dirty {
            return;
        }

        if self.projection_dirty {
            let (width, height) = self.viewport;
            let aspect = if width == 0 || height == 0 {
                1.0
            } else {
                width as f32 / height as f32
            };
            let projection =
                Mat4::perspective_rh(self.vertical_fov.to_radians(), aspect, self.near, self.far);
            self.inverse_projection = projection.inverse();
        }

        if self.view_dirty {
            let view = Mat4::look_at_rh(
                self.position,
                self.position + self.forward,
                view_up(self.forward),
            );
            self.inverse_view = view.inverse();
        }

        self.rebuild_ray_directions();
        self.projection_dirty = false;
        self.view_dirty = false;
    }

    fn rebuild_ray_directions(&mut self) {
        let (width, height) = self.viewport;
        let count = width as usize * height as usize;

        let direction_at = |index: usize| {
            let x = (index % width as usize) as u32;
            let y = (index / width as usize) as u32;
            self.direction_for(x, y)
        };

        self.ray_directions = if count >= PARALLEL_TABLE_THRESHOLD {
            (0..count).into_par_iter().map(direction_at).collect()
        } else {
            (0..count).map(direction_at).collect()
        };

        log::debug!("Rebuilt {} camera ray directions for {}x{}", count, width, height);
    }

    /// World-space direction through the centre of pixel (x, y).
    /// Row 0 is the bottom of the image.
    fn direction_for(&self, x: u32, y: u32) -> Vec3 {
        let (width, height) = self.viewport;
        let coord = Vec2::new(
            (x as f32 + 0.5) / width as f32,
            (y as f32 + 0.5) / height as f32,
        ) * 2.0
            - Vec2::ONE;

        let target = self.inverse_projection * Vec4::new(coord.x, coord.y, 1.0, 1.0);
        let view_direction = (target.truncate() / target.w).normalize();
        self.inverse_view
            .transform_vector3(view_direction)
            .normalize()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(45.0, 0.1, 100.0)
    }
}

impl RayCamera for Camera {
    fn origin(&self) -> Vec3 {
        self.position
    }

    fn ray_directions(&self) -> &[Vec3] {
        &self.ray_directions
    }

    fn viewport(&self) -> (u32, u32) {
        self.viewport
    }
}
