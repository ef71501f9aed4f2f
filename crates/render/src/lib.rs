//! Rendering Adapter: renderer-agnostic interface and camera math.
//!
//! # Invariants
//! - Renderers cannot mutate layout state.
//! - Rendering is a pure function of state: the same layout always draws
//!   the same output, so visuals can be rebuilt from scratch at any time.

mod camera;
mod renderer;

pub use camera::{FirstPersonCamera, screen_to_ndc};
pub use renderer::{Renderer, TextRenderer};
