pub mod args;
pub mod error;
pub mod model;
pub mod score;
pub mod seed;
pub mod storage;
pub mod controller {
    pub mod score;
}

pub use error::CoreError;
pub use score::{aggregate, compute_status, is_hole_editable, resolve_hole};
