//! Developer tooling: read-only inspection of scene and grid state.
//!
//! # Invariants
//! - Inspectors never mutate what they look at.

mod inspector;

pub use inspector::{BlockInfo, GridSummary, LayoutInspector, LayoutSummary};

pub fn crate_info() -> &'static str {
    concat!("mansion-tools v", env!("CARGO_PKG_VERSION"))
}
