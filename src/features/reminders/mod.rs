//! # Feature: Care Reminders
//!
//! Posts a reminder into a plant thread once per due window.
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Notifier seam, send timeout, one-shot mode
//! - 1.0.0: Polling reminder loop

pub mod notifier;
pub mod scheduler;

pub use notifier::{DiscordNotifier, Notifier};
pub use scheduler::{CycleReport, ReminderOutcome, ReminderScheduler};
