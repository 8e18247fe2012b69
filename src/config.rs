pub mod studies;
pub use studies::*;

pub mod machines;
pub use machines::*;

pub mod regtest;
pub use regtest::*;

pub mod target;
pub use target::*;
