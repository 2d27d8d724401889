// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. store::StoreError)
    clippy::module_name_repetitions
)]

//! # memopad
//!
//! A terminal markdown memo pad.
//!
//! memopad keeps memos and users in a JSON data file and offers:
//! - A content editor that continues `- ` bullets on Enter and indents
//!   with Tab / Shift+Tab
//! - A live preview that draws list markers by nesting depth
//! - Validated user records with unique emails
//!
//! ## Architecture
//!
//! memopad uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`config`]: Flags files and default paths
//! - [`document`]: Markdown parsing and preview layout
//! - [`editor`]: Text buffer and the markdown editing engine
//! - [`store`]: Memo and user persistence
//! - [`ui`]: Terminal UI components

pub mod app;
pub mod config;
pub mod document;
pub mod editor;
pub mod store;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::Document;
    pub use crate::editor::{EditorBuffer, Selection};
    pub use crate::store::Store;
}
