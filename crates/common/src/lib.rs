//! Shared vocabulary for the mansion builder.
//!
//! # Invariants
//! - The block catalog is a closed set; unknown names are rejected, never guessed.
//! - Rotations are always one of the four quarter turns.

pub mod catalog;
pub mod types;

pub use catalog::{BlockKind, CatalogError, Rgb};
pub use types::{CellCoord, GridPos, Rotation, Theme};
