//! # Core Module
//!
//! Configuration and error handling for the plant care bot.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add error module with the care error taxonomy
//! - 1.0.0: Initial creation with config module

pub mod config;
pub mod error;

// Re-export commonly used items
pub use config::{Config, SchedulerMode};
pub use error::{CareError, CareResult};
