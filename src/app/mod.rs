// LogTally - app/mod.rs
//
// Application layer: per-file reading and batch orchestration.
// Dependencies: core and platform layers.

pub mod analysis;
pub mod reader;
