//! Persistence: a browser-style local storage and the layout dumps kept in it.
//!
//! # Invariants
//! - One key (`mansionLayout`) per storage namespace holds the whole layout.
//! - The stored value is a plain JSON array of records: no version, no
//!   compression, written and read verbatim.
//! - A failed load never touches the in-memory layout.

pub mod layout_store;
pub mod storage;

pub use layout_store::{LAYOUT_KEY, load_grid, load_layout, save_grid, save_layout};
pub use storage::{DirStorage, MemoryStorage, Storage, StoreError};
