//! # Feature: Plant Care Tracking
//!
//! Per-thread care schedules (watering, fertilizing) with independent
//! reminder windows per metric.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod catalog;
pub mod commands;
pub mod record;
pub mod store;
pub mod tracker;

pub use catalog::{MetricCatalog, MetricDefinition, FERTILIZER, WATER};
pub use commands::{execute_care_command, format_status, CareCommand, CommandReply};
pub use record::{CareRecord, MetricPhase, MetricState};
pub use store::CareStore;
pub use tracker::CareTracker;
