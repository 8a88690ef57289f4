//! Filtered directory purge: target table, physical tree removal, and the
//! per-category engine.

pub mod engine;
pub mod remover;
pub mod target;
