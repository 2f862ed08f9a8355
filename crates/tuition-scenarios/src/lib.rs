//! Tuition scenario modelling: load a program table, map its columns, and
//! project per-credit tuition and revenue under a configurable credit mix.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
