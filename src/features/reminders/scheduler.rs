//! Reminder scheduler
//!
//! Scans every plant, posts one reminder per due metric and marks it
//! reminded once delivery succeeded. Failed deliveries leave the metric due,
//! so the next cycle retries them.
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Generic per-metric cycle with send timeout and cycle reports
//! - 1.0.0: Fixed water/fertilizer polling loop

use log::{debug, error, info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::notifier::Notifier;
use crate::core::{CareError, CareResult};
use crate::features::care::CareTracker;

/// One reminder the cycle attempted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderOutcome {
    pub thread_id: u64,
    pub metric: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary of one scan-and-notify pass
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub cycle_id: Uuid,
    pub now: i64,
    /// Records with at least one logged metric
    pub records_scanned: usize,
    pub sent: Vec<ReminderOutcome>,
    pub failed: Vec<ReminderOutcome>,
}

impl CycleReport {
    fn new(now: i64) -> Self {
        CycleReport {
            cycle_id: Uuid::new_v4(),
            now,
            records_scanned: 0,
            sent: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// True when the cycle attempted no delivery at all
    pub fn is_empty(&self) -> bool {
        self.sent.is_empty() && self.failed.is_empty()
    }
}

pub struct ReminderScheduler {
    tracker: CareTracker,
    notifier: Arc<dyn Notifier>,
    send_timeout: Duration,
}

impl ReminderScheduler {
    pub fn new(tracker: CareTracker, notifier: Arc<dyn Notifier>, send_timeout: Duration) -> Self {
        ReminderScheduler {
            tracker,
            notifier,
            send_timeout,
        }
    }

    /// Run one full cycle at `now`
    ///
    /// Only a store failure aborts the cycle; delivery failures are recorded
    /// in the report and the scan moves on.
    pub async fn run_cycle(&self, now: i64) -> CareResult<CycleReport> {
        let mut report = CycleReport::new(now);
        let records = self.tracker.store().list_all().await?;
        let catalog = self.tracker.catalog();

        for record in records.iter().filter(|r| r.is_tracked()) {
            report.records_scanned += 1;

            for (metric, state) in &record.metrics {
                if !CareTracker::is_due(record, metric, now) {
                    continue;
                }
                let Some(window) = state.last_action_time else {
                    continue;
                };

                let text = catalog.reminder_text(metric);
                match self.deliver(record.thread_id, &text).await {
                    Ok(()) => {
                        let marked = self
                            .tracker
                            .mark_reminded_for_window(record.thread_id, metric, window)
                            .await?;
                        if !marked {
                            debug!(
                                "[{}] Thread {} {metric} was logged again during delivery",
                                report.cycle_id, record.thread_id
                            );
                        }
                        report.sent.push(ReminderOutcome {
                            thread_id: record.thread_id,
                            metric: metric.clone(),
                            error: None,
                        });
                    }
                    Err(e) => {
                        warn!(
                            "[{}] Error sending {metric} reminder to thread {}: {e}",
                            report.cycle_id, record.thread_id
                        );
                        report.failed.push(ReminderOutcome {
                            thread_id: record.thread_id,
                            metric: metric.clone(),
                            error: Some(e.to_string()),
                        });
                    }
                }
            }
        }

        if report.is_empty() {
            debug!(
                "[{}] Reminder cycle: {} plant(s), nothing due",
                report.cycle_id, report.records_scanned
            );
        } else {
            info!(
                "[{}] Reminder cycle: {} plant(s), {} sent, {} failed",
                report.cycle_id,
                report.records_scanned,
                report.sent.len(),
                report.failed.len()
            );
        }

        Ok(report)
    }

    async fn deliver(&self, thread_id: u64, text: &str) -> CareResult<()> {
        match timeout(self.send_timeout, self.notifier.send(thread_id, text)).await {
            Ok(result) => result,
            Err(_) => Err(CareError::DeliveryFailure(format!(
                "timed out after {}ms",
                self.send_timeout.as_millis()
            ))),
        }
    }

    /// Run a single cycle against the wall clock
    pub async fn run_once(&self) -> CareResult<CycleReport> {
        self.run_cycle(chrono::Utc::now().timestamp()).await
    }

    /// Run a cycle every `period` until `cancel` fires
    ///
    /// The first cycle starts immediately.
    pub async fn run(&self, period: Duration, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Reminder scheduler started (interval: {}s)",
            period.as_secs()
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Reminder scheduler stopped");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.run_once().await {
                        error!("Reminder cycle aborted, retrying next period: {e}");
                    }
                }
            }
        }
    }
}
