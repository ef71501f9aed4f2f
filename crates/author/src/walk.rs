use glam::{Vec2, Vec3};
use mansion_input::{Joystick, MoveKeys};
use mansion_kernel::{Layout, Ray};
use mansion_render::FirstPersonCamera;

/// Velocity to distance, per frame.
pub const FRAME_SCALE: f32 = 0.01;
/// How far the camera drops each frame with nothing underfoot.
pub const GRAVITY: f32 = 0.1;
/// Eye height above the surface the player stands on.
pub const EYE_HEIGHT: f32 = 1.5;
/// The ground probe starts this far below the eye.
const PROBE_DROP: f32 = 0.5;
/// Falling below this height puts the player back at the spawn point.
pub const RESPAWN_HEIGHT: f32 = -30.0;
/// Above the middle of the ground layer.
pub const SPAWN_POINT: Vec3 = Vec3::new(0.0, 5.0, 0.0);

/// The walking player: a first-person camera driven by held keys and the
/// touch joystick, pulled down by gravity onto whatever block is below.
#[derive(Debug, Clone, Default)]
pub struct Walker {
    pub camera: FirstPersonCamera,
    pub keys: MoveKeys,
    pub joystick: Joystick,
    grounded: bool,
}

impl Walker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one frame against `layout`.
    pub fn step(&mut self, layout: &Layout) {
        let velocity = self.keys.velocity();
        self.camera.move_right(velocity.x * FRAME_SCALE);
        self.camera.move_forward(velocity.z * FRAME_SCALE);
        self.camera.position.y += velocity.y * FRAME_SCALE;

        let feet = self.camera.position - Vec3::Y * PROBE_DROP;
        let probe = Ray::new(feet, Vec3::NEG_Y);
        match layout.raycast(&probe, EYE_HEIGHT) {
            Some(hit) if hit.distance < EYE_HEIGHT => {
                self.camera.position.y = hit.point.y + EYE_HEIGHT;
                self.keys.clear_vertical();
                self.grounded = true;
            }
            _ => {
                self.camera.position.y -= GRAVITY;
                self.grounded = false;
            }
        }

        let stick = self.joystick.velocity();
        if stick != Vec2::ZERO {
            self.camera.move_right(stick.x * FRAME_SCALE);
            self.camera.move_forward(stick.y * FRAME_SCALE);
        }

        if self.camera.position.y < RESPAWN_HEIGHT {
            tracing::info!(
                x = self.camera.position.x,
                z = self.camera.position.z,
                "fell out of the world, respawning"
            );
            self.camera.position = SPAWN_POINT;
            self.keys.clear();
        }
    }

    /// Whether the last step ended standing on a block.
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Where the player marker is drawn: one unit below the eye.
    pub fn marker_position(&self) -> Vec3 {
        self.camera.position - Vec3::Y
    }
}

/// Fixed-rate stepping from variable frame times.
#[derive(Debug, Clone, Copy)]
pub struct FixedStep {
    step: f32,
    accumulator: f32,
}

impl FixedStep {
    /// Browser animation frames run at this rate.
    pub const DEFAULT_HZ: f32 = 60.0;
    /// Longest frame time fed in at once, so a stall doesn't trigger a burst
    /// of catch-up steps.
    const MAX_FRAME: f32 = 0.1;

    pub fn new(hz: f32) -> Self {
        Self {
            step: 1.0 / hz,
            accumulator: 0.0,
        }
    }

    /// Add `elapsed` seconds; returns how many whole steps are due.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.clamp(0.0, Self::MAX_FRAME);
        let mut steps = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            steps += 1;
        }
        steps
    }
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HZ)
    }
}
