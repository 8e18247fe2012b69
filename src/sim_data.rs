pub mod columns;
pub use columns::*;

pub mod table;
pub use table::*;

pub mod hospital;
pub use hospital::*;

pub mod county;
pub use county::*;
