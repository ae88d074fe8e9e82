//! Data models for analyzer records and the diagnostics published from them.

pub mod diagnostic;
pub mod published;
