// LogTally - lib.rs
//
// Library entry point, exposing all modules for integration testing and for
// front ends (the CLI in main.rs, or any UI) that call into the core.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
