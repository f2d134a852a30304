//! Application layer managing state and the brew workflow.
//!
//! This module coordinates between the domain layer and presentation
//! layer: it owns the brew session, the timer handles, and the command
//! surface the UI drives.

pub mod clock;
pub mod state;

pub use clock::*;
pub use state::*;
