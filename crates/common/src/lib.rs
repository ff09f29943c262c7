//! CareLab Common Utilities
//!
//! Shared infrastructure for all CareLab crates:
//! - Error types and result aliases
//! - Video timing helpers (frames, dwell, seconds)
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
