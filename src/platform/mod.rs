// LogTally - platform/mod.rs
//
// Platform abstraction layer: filesystem reads, input expansion, config.
// Dependencies: util, and core::model for the dialect type.

pub mod config;
pub mod fs;
