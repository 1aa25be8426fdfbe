//! Report module - statistics display, charts, summary and JSON export

pub mod display;
pub mod export;
pub mod plots;
pub mod summary;

pub use display::*;
pub use export::*;
pub use plots::*;
pub use summary::*;
