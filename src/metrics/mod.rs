//! Metrics a finished game exposes to achievement conditions

mod state;

pub use state::*;
