//! Pipeline module - fetch, cache, load and reduce

pub mod archive;
pub mod loader;
pub mod reducer;
pub mod stats;
pub mod table;

pub use archive::*;
pub use loader::*;
pub use reducer::*;
pub use stats::*;
pub use table::*;
