//! Mansion kernel: the authoritative layout state both views are drawn from.
//!
//! # Invariants
//! - At most one block per scene coordinate; the grid always has every cell.
//! - Ground positions are never removed.
//! - All state mutations flow through explicit operations and leave the
//!   state untouched when they fail.

pub mod grid;
pub mod layout;
pub mod pick;

pub use grid::{Cell, CellRecord, GRID_COLUMNS, GRID_ROWS, GridLayout};
pub use layout::{Block, BlockRecord, Layout, LayoutError, LayoutEvent};
pub use pick::{Ray, RayHit};
