//! Core types: errors, configuration, installation paths.

pub mod config;
pub mod errors;
pub mod paths;
