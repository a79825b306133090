//! Care commands independent of the chat platform
//!
//! The Discord handler resolves the thread context and hands a parsed
//! [`CareCommand`] to [`execute_care_command`]; everything else happens here.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: water, fertilize, interval, fertilizer_interval and status

use log::info;

use super::catalog::{MetricCatalog, FERTILIZER, WATER};
use super::record::{CareRecord, MetricPhase, MetricState};
use super::tracker::CareTracker;
use crate::core::{CareError, CareResult};

pub const NOT_IN_THREAD_MESSAGE: &str = "🌱 Use this command inside a plant thread.";
pub const NO_DATA_MESSAGE: &str = "🌱 No plant data yet.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CareCommand {
    RecordAction { metric: String },
    SetInterval { metric: String, days: i64 },
    Status,
}

impl CareCommand {
    /// Map a slash command name and its `days` option to a care command
    pub fn from_invocation(name: &str, days: Option<i64>) -> CareResult<Self> {
        let missing_days =
            || CareError::InvalidArgument("the `days` option is required".to_string());

        match name {
            "water" => Ok(CareCommand::RecordAction {
                metric: WATER.to_string(),
            }),
            "fertilize" => Ok(CareCommand::RecordAction {
                metric: FERTILIZER.to_string(),
            }),
            "interval" => Ok(CareCommand::SetInterval {
                metric: WATER.to_string(),
                days: days.ok_or_else(missing_days)?,
            }),
            "fertilizer_interval" => Ok(CareCommand::SetInterval {
                metric: FERTILIZER.to_string(),
                days: days.ok_or_else(missing_days)?,
            }),
            "status" => Ok(CareCommand::Status),
            other => Err(CareError::InvalidArgument(format!(
                "unknown care command `{other}`"
            ))),
        }
    }
}

/// Text sent back to the user, and whether only they should see it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    pub content: String,
    pub ephemeral: bool,
}

impl CommandReply {
    fn public(content: impl Into<String>) -> Self {
        CommandReply {
            content: content.into(),
            ephemeral: false,
        }
    }

    /// User-facing reply for a failed command
    pub fn from_error(err: &CareError) -> Self {
        let content = match err {
            CareError::NotInTrackedContext => NOT_IN_THREAD_MESSAGE.to_string(),
            CareError::InvalidArgument(msg) => format!("❌ Invalid value: {msg}."),
            CareError::StoreUnavailable(_) => {
                "❌ I couldn't reach the plant database. Please try again.".to_string()
            }
            CareError::DeliveryFailure(_) => {
                "❌ Sorry, I couldn't reach Discord. Please try again.".to_string()
            }
        };
        CommandReply {
            content,
            ephemeral: true,
        }
    }
}

/// Run a care command for the thread the user is in
///
/// `thread_id` is `None` when the command was used outside a thread; the
/// command is then rejected without touching any state.
pub async fn execute_care_command(
    tracker: &CareTracker,
    thread_id: Option<u64>,
    command: &CareCommand,
    now: i64,
) -> CareResult<CommandReply> {
    let thread_id = thread_id.ok_or(CareError::NotInTrackedContext)?;
    let catalog = tracker.catalog();

    match command {
        CareCommand::RecordAction { metric } => {
            tracker.record_action(thread_id, metric, now).await?;
            info!("Logged {metric} for plant thread {thread_id}");

            let reply = catalog
                .get(metric)
                .map(|def| def.action_reply.clone())
                .unwrap_or_else(|| format!("✅ Logged {metric}! Timer reset."));
            Ok(CommandReply::public(reply))
        }
        CareCommand::SetInterval { metric, days } => {
            tracker.set_interval(thread_id, metric, *days).await?;
            info!("Set {metric} interval to {days} day(s) for plant thread {thread_id}");

            let label = catalog
                .get(metric)
                .map(|def| def.interval_label.clone())
                .unwrap_or_else(|| metric.clone());
            Ok(CommandReply::public(format!(
                "⏱ {label} interval set to **{days} days**"
            )))
        }
        CareCommand::Status => match tracker.status(thread_id).await? {
            Some(record) => Ok(CommandReply::public(format_status(&record, catalog, now))),
            None => Ok(CommandReply::public(NO_DATA_MESSAGE)),
        },
    }
}

/// Render the status view for one plant
pub fn format_status(record: &CareRecord, catalog: &MetricCatalog, now: i64) -> String {
    let day_seconds = catalog.day_seconds();
    let mut text = String::from("🌿 **Plant Status**");

    for def in catalog.iter() {
        let fallback = MetricState::new(catalog.default_interval_seconds(&def.name));
        let state = record.metric(&def.name).unwrap_or(&fallback);
        text.push('\n');
        text.push_str(&status_line(&def.past_tense, state, now, day_seconds));
    }

    // Metrics logged through older catalogs still show up
    for (name, state) in &record.metrics {
        if catalog.get(name).is_none() {
            text.push('\n');
            text.push_str(&status_line(name, state, now, day_seconds));
        }
    }

    text
}

fn status_line(label: &str, state: &MetricState, now: i64, day_seconds: i64) -> String {
    let interval_days = state.interval_seconds / day_seconds;
    let last = match state.last_action_time {
        Some(last) => format!("**{} days ago**", (now - last).max(0) / day_seconds),
        None => "**never**".to_string(),
    };
    let marker = match state.phase(now) {
        MetricPhase::Unset => String::new(),
        MetricPhase::Active { due_at } => {
            let days_left = (due_at - now) / day_seconds;
            match days_left {
                0 => " · next reminder in less than a day".to_string(),
                1 => " · next reminder in 1 day".to_string(),
                n => format!(" · next reminder in {n} days"),
            }
        }
        MetricPhase::Due => " · ⏰ due now".to_string(),
        MetricPhase::Reminded => " · 🔔 reminder sent".to_string(),
    };

    format!("Last {label}: {last} (Interval: {interval_days} days){marker}")
}
