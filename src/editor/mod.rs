//! Lightweight editor module for in-place markdown editing.
//!
//! Provides a rope-backed text buffer with selection management and the
//! list-aware editing engine, designed for integration into the TEA
//! architecture.

mod buffer;
pub mod engine;

pub use buffer::{Change, Direction, EditorBuffer, Selection};
pub use engine::Edit;
