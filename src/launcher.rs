pub mod status;
pub use status::*;

pub mod executable;
pub use executable::*;

pub mod batch;
pub use batch::*;

pub mod run_spec;
pub use run_spec::*;

pub mod jobs;
pub use jobs::*;
