//! # Features Layer
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

pub mod care;
pub mod reminders;

pub use care::{CareRecord, CareTracker, MetricCatalog};
pub use reminders::{CycleReport, DiscordNotifier, Notifier, ReminderScheduler};
