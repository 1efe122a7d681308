//! Progress adapter: profiles, game recording and storage
//!
//! The engine never touches storage. A host records a finished
//! [`GameSummary`](crate::trainer::GameSummary) into a [`UserProfile`] and
//! saves it through a [`ProgressStore`].

mod profile;
mod recorder;
mod store;


pub use profile::*;
pub use recorder::*;
pub use store::*;
