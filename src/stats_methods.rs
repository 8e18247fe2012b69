pub mod stats;
pub use stats::*;

pub mod norms;
pub use norms::*;
