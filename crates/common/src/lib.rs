//! Cursor Flow Common Utilities
//!
//! Shared infrastructure for all Cursor Flow crates:
//! - Error taxonomy and result aliases
//! - Clocks for capture epochs and frame-delta tracking
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
