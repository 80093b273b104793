//! termglyph Core
//!
//! Shared plumbing for the termglyph crates: logging setup, profiling scopes,
//! math re-exports and the application-level [`Config`].

pub mod config;
pub mod logging;
pub mod math;
pub mod profiling;

pub use config::{Config, ProfilingMode};
