// LogTally - core/mod.rs
//
// Core business logic layer: extraction, tallying, rendering, export.
// Must NOT depend on: app or platform. Takes strings and records in, gives
// tallies and text out.

pub mod export;
pub mod model;
pub mod parser;
pub mod report;
pub mod tally;
