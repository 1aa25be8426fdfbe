//! exoscope: Exoplanet Dataset Profiling Library
//!
//! Downloads and caches a NASA Exoplanet Archive table, then reduces it to its
//! informative columns (fully-null rows removed, a unique column promoted to index,
//! mostly-null columns dropped) and summarizes nulls, uniqueness and dtypes.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
