//! In-world authoring: the editor session and the walking player.
//!
//! # Invariants
//! - The session is the single owner of editor state; every edit goes
//!   through it.
//! - Every layout mutation produces an event record.
//! - Walking never edits the layout; it only reads it for ground contact.

pub mod session;
pub mod walk;

pub use session::{Notice, PICK_RANGE, Session, SessionError, Stores};
pub use walk::{FixedStep, Walker};
