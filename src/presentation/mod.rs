//! Presentation layer handling terminal UI and user input.
//!
//! This module renders the brew session with ratatui and translates key
//! events into controller commands. It holds no brew logic of its own:
//! everything it shows comes from the controller's snapshot, and
//! everything it does goes through the controller's commands.

pub mod input;
pub mod ui;

pub use input::*;
pub use ui::*;
