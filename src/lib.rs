//! TBREW - Terminal Brew Timer Library
//!
//! A terminal V60 pour-over guide: scaled recipes driven by a running
//! clock that highlights the active pour and advances automatically.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application::*;
pub use domain::*;
