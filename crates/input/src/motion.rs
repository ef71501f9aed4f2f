use glam::{Vec2, Vec3};

/// Speed a held movement key sets on its axis, before the per-frame scale.
pub const MOVE_SPEED: f32 = 5.0;

/// Joystick base radius, in pixels.
pub const JOYSTICK_OUTER_RADIUS: f32 = 50.0;
/// Joystick knob radius, in pixels.
pub const JOYSTICK_INNER_RADIUS: f32 = 20.0;

/// A movement key, independent of any windowing library's key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Back,
    Left,
    Right,
    Up,
}

/// Per-axis velocity driven by held keys.
///
/// `x` is rightward, `y` upward, `z` forward, all camera-relative.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveKeys {
    velocity: Vec3,
}

impl MoveKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// A key went down: set that axis to full speed in the key's direction.
    pub fn press(&mut self, key: MoveKey) {
        match key {
            MoveKey::Forward => self.velocity.z = MOVE_SPEED,
            MoveKey::Back => self.velocity.z = -MOVE_SPEED,
            MoveKey::Left => self.velocity.x = -MOVE_SPEED,
            MoveKey::Right => self.velocity.x = MOVE_SPEED,
            MoveKey::Up => self.velocity.y = MOVE_SPEED,
        }
    }

    /// A key came up: stop along its axis, whichever direction was held.
    pub fn release(&mut self, key: MoveKey) {
        match key {
            MoveKey::Forward | MoveKey::Back => self.velocity.z = 0.0,
            MoveKey::Left | MoveKey::Right => self.velocity.x = 0.0,
            MoveKey::Up => self.velocity.y = 0.0,
        }
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Landing cancels any upward push.
    pub fn clear_vertical(&mut self) {
        self.velocity.y = 0.0;
    }

    pub fn clear(&mut self) {
        self.velocity = Vec3::ZERO;
    }
}

/// On-screen touch joystick.
///
/// The base appears where the finger lands (left half of the surface only);
/// the knob follows the finger, clamped to `outer - inner` pixels from the
/// base.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Joystick {
    touch: Option<u64>,
    center: Vec2,
    offset: Vec2,
}

impl Joystick {
    pub fn new() -> Self {
        Self::default()
    }

    /// Farthest the knob can travel from the base.
    pub fn max_travel() -> f32 {
        JOYSTICK_OUTER_RADIUS - JOYSTICK_INNER_RADIUS
    }

    /// A touch started at `pos`. Only touches on the left half of a
    /// `surface_width`-wide surface grab the joystick. Returns whether it did.
    pub fn touch_start(&mut self, id: u64, pos: Vec2, surface_width: f32) -> bool {
        if self.touch.is_some() || pos.x >= surface_width / 2.0 {
            return false;
        }
        self.touch = Some(id);
        self.center = pos;
        self.offset = Vec2::ZERO;
        tracing::trace!(id, x = pos.x, y = pos.y, "joystick grabbed");
        true
    }

    /// The finger moved. Ignored unless it is the touch holding the stick.
    pub fn touch_move(&mut self, id: u64, pos: Vec2) {
        if self.touch != Some(id) {
            return;
        }
        let delta = pos - self.center;
        let max = Self::max_travel();
        let distance = delta.length();
        self.offset = if distance > max {
            delta * (max / distance)
        } else {
            delta
        };
    }

    /// The finger lifted or the touch was cancelled.
    pub fn touch_end(&mut self, id: u64) {
        if self.touch == Some(id) {
            *self = Self::default();
        }
    }

    /// Let go of whichever touch holds the stick.
    pub fn release(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.touch.is_some()
    }

    /// Where the base is drawn.
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Knob position relative to the base, in pixels.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Movement the stick asks for, as (rightward, forward) speed.
    ///
    /// Full deflection equals [`MOVE_SPEED`]. Dragging up moves forward.
    pub fn velocity(&self) -> Vec2 {
        if !self.is_active() {
            return Vec2::ZERO;
        }
        let scale = MOVE_SPEED / Self::max_travel();
        Vec2::new(self.offset.x * scale, -self.offset.y * scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_set_constant_speed_per_axis() {
        let mut keys = MoveKeys::new();
        keys.press(MoveKey::Forward);
        keys.press(MoveKey::Left);
        assert_eq!(keys.velocity(), Vec3::new(-MOVE_SPEED, 0.0, MOVE_SPEED));

        keys.press(MoveKey::Back);
        assert_eq!(keys.velocity().z, -MOVE_SPEED);

        keys.release(MoveKey::Forward);
        assert_eq!(keys.velocity().z, 0.0);
        assert_eq!(keys.velocity().x, -MOVE_SPEED);
    }

    #[test]
    fn up_and_clear_vertical() {
        let mut keys = MoveKeys::new();
        keys.press(MoveKey::Up);
        assert_eq!(keys.velocity().y, MOVE_SPEED);
        keys.clear_vertical();
        assert_eq!(keys.velocity(), Vec3::ZERO);
    }

    #[test]
    fn joystick_only_grabs_left_half() {
        let mut stick = Joystick::new();
        assert!(!stick.touch_start(1, Vec2::new(700.0, 300.0), 1000.0));
        assert!(!stick.is_active());
        assert!(stick.touch_start(2, Vec2::new(100.0, 300.0), 1000.0));
        assert!(stick.is_active());
        // A second finger does not steal it.
        assert!(!stick.touch_start(3, Vec2::new(120.0, 300.0), 1000.0));
    }

    #[test]
    fn joystick_clamps_travel() {
        let mut stick = Joystick::new();
        stick.touch_start(1, Vec2::new(100.0, 100.0), 1000.0);
        stick.touch_move(1, Vec2::new(100.0, 40.0)); // 60 px up
        assert_eq!(stick.offset(), Vec2::new(0.0, -30.0));
        let v = stick.velocity();
        assert!((v.y - MOVE_SPEED).abs() < 1e-5);
        assert_eq!(v.x, 0.0);

        stick.touch_move(1, Vec2::new(115.0, 100.0)); // within reach
        assert_eq!(stick.offset(), Vec2::new(15.0, 0.0));
        assert!((stick.velocity().x - MOVE_SPEED / 2.0).abs() < 1e-5);
    }

    #[test]
    fn joystick_ignores_other_touches_and_resets_on_end() {
        let mut stick = Joystick::new();
        stick.touch_start(7, Vec2::new(50.0, 50.0), 1000.0);
        stick.touch_move(8, Vec2::new(80.0, 50.0));
        assert_eq!(stick.offset(), Vec2::ZERO);

        stick.touch_move(7, Vec2::new(60.0, 50.0));
        stick.touch_end(8);
        assert!(stick.is_active());
        stick.touch_end(7);
        assert!(!stick.is_active());
        assert_eq!(stick.velocity(), Vec2::ZERO);
    }

    #[test]
    fn release_drops_any_touch() {
        let mut stick = Joystick::new();
        stick.touch_start(4, Vec2::new(50.0, 50.0), 1000.0);
        stick.touch_move(4, Vec2::new(50.0, 20.0));
        assert_ne!(stick.velocity(), Vec2::ZERO);
        stick.release();
        assert!(!stick.is_active());
        assert_eq!(stick.velocity(), Vec2::ZERO);
        assert!(stick.touch_start(5, Vec2::new(60.0, 60.0), 1000.0));
    }
}
