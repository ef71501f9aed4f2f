//! Input: discrete editor actions and continuous movement state.
//!
//! # Invariants
//! - Mouse, keyboard, touch and the CLI all produce the same `Action`s.
//! - Movement state is per-axis and discrete: a key sets a constant speed,
//!   releasing it zeroes that axis.

pub mod action;
pub mod motion;

pub use action::Action;
pub use motion::{
    JOYSTICK_INNER_RADIUS, JOYSTICK_OUTER_RADIUS, Joystick, MOVE_SPEED, MoveKey, MoveKeys,
};
