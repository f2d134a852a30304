//! Infrastructure layer providing system-level services.
//!
//! This module contains the timer threads that drive the brew clock and
//! the blink cadence; everything else in the crate is synchronous.

pub mod timers;

pub use timers::*;
