pub mod tokens;
pub use tokens::*;

pub mod format;
pub use format::*;

pub mod run_info;
pub use run_info::*;
