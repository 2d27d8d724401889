//! Terminal UI components.
//!
//! The view half of the app: everything here reads the [`Model`] and draws
//! it, and nothing here talks to the store.
//! - [`style`]: Theming and colors
//!
//! [`Model`]: crate::app::Model

pub mod style;

mod overlays;
mod render;
mod status;

pub use render::{line_number_width, render, split_main_columns};

pub const LIST_WIDTH_PERCENT: u16 = 40;
pub const FORM_WIDTH_PERCENT: u16 = 60;

#[cfg(test)]
mod tests;
