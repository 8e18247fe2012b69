pub mod stack;
pub use stack::*;

pub mod metrics;
pub use metrics::*;

pub mod loading;
pub use loading::*;
