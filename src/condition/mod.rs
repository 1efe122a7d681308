//! Achievement condition language
//!
//! Parses strings like `WON=1 & BAD=0 & TIME<60` and evaluates them against
//! a [`MetricState`](crate::metrics::MetricState).

mod ast;
pub mod cache;
mod evaluator;
pub mod parser;


pub use ast::*;
pub use cache::*;
pub use evaluator::*;
pub use parser::*;
