//! Progression engine: sessions, scoring and the session clock

mod algorithm;
mod clock;
mod engine;
mod scoring;
mod session;

#[cfg(test)]
mod property_tests;

pub use algorithm::*;
pub use clock::*;
pub use engine::*;
pub use scoring::*;
pub use session::*;
