//! Match-play scoring: hole resolution, match status, standings and the edit
//! lock rules. Everything except `context` is pure and synchronous.

pub mod context;
pub mod hole;
pub mod lock;
pub mod standings;
pub mod status;

pub use context::*;
pub use hole::*;
pub use lock::*;
pub use standings::*;
pub use status::*;
