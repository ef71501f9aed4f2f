use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};
use mansion_kernel::Ray;

/// Walking camera: position plus yaw/pitch look direction.
///
/// Movement is horizontal and camera-relative, like a person walking; the
/// look direction may tilt up and down but never past vertical.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstPersonCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub sensitivity: f32,
}

impl FirstPersonCamera {
    /// Where a new camera stands.
    pub const START: Vec3 = Vec3::new(0.0, 5.0, 10.0);
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self {
            position: Self::START,
            yaw: -90.0_f32.to_radians(),
            pitch: 0.0,
            fov: 75.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            sensitivity: 0.003,
        }
    }
}

impl FirstPersonCamera {
    /// Look direction.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    /// Look direction flattened onto the ground plane.
    pub fn flat_forward(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin())
    }

    pub fn right(&self) -> Vec3 {
        self.flat_forward().cross(Vec3::Y).normalize()
    }

    /// Walk `distance` along the flattened look direction.
    pub fn move_forward(&mut self, distance: f32) {
        self.position += self.flat_forward() * distance;
    }

    /// Strafe `distance` to the right.
    pub fn move_right(&mut self, distance: f32) {
        self.position += self.right() * distance;
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch -= dy * self.sensitivity;
        self.pitch = self
            .pitch
            .clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray from the eye through a point given in normalized device
    /// coordinates (`-1..1` on both axes, `+y` up).
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let far = inverse * glam::Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let far = far.xyz() / far.w;
        Ray::new(self.position, far - self.position)
    }
}

/// Convert a pixel position on a `width` x `height` surface to normalized
/// device coordinates.
pub fn screen_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        (x / width.max(1.0)) * 2.0 - 1.0,
        -((y / height.max(1.0)) * 2.0 - 1.0),
    )
}
