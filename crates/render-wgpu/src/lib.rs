//! wgpu render backend for the mansion scene.
//!
//! Draws every block as an instanced unit cube colored by its kind and
//! turned by its rotation, plus a small unlit marker under the player.
//!
//! # Invariants
//! - Renderer never mutates layout state.
//! - Instances are rebuilt from the layout every frame; there is no
//!   retained scene graph to drift out of sync.

mod gpu;
mod instances;
mod shaders;

pub use gpu::{FrameParams, WgpuRenderer};
pub use instances::{InstanceData, MARKER_SCALE, build_instances, clear_color};
