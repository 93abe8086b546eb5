pub mod hole_input;
pub mod types;
pub mod utils;

pub use hole_input::*;
pub use types::*;
pub use utils::*;
