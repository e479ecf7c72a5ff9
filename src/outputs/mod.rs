//! Output generation: JSON files and the end-of-run log report.
//!
//! # Submodules
//!
//! - [`json`]: writes per-source summaries and the combined snapshot
//! - [`report`]: logs each source's top trends after a run

pub mod json;
pub mod report;
