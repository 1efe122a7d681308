//! Achievement unlocking

mod checker;

pub use checker::*;
