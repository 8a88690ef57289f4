//! Activity logging: terminal lines plus an optional JSONL trail.

pub mod activity;
pub mod jsonl;
