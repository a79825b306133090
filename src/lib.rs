// Core layer - configuration and error types
pub mod core;

// Features layer - care tracking and reminders
pub mod features;

// Infrastructure
pub mod database;

// Application layer
pub mod command_handler;
pub mod commands;

pub use core::{CareError, Config};

pub use features::{
    // Care tracking
    CareRecord, CareTracker, MetricCatalog,
    // Reminders
    CycleReport, DiscordNotifier, Notifier, ReminderScheduler,
};
