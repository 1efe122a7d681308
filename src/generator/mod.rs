//! Array generator for new sessions

mod sequence;

#[cfg(test)]
mod property_tests;

pub use sequence::*;
