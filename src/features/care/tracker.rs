//! Care tracker: the per-metric reminder state machine
//!
//! Every metric of every plant thread moves through
//! `Unset → Active → Due → Reminded`. Logging an action moves any phase back
//! to `Active`; changing the interval only moves the deadline.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.2.0: Per-thread lock entries are dropped once no operation holds them
//! - 1.1.0: Window-guarded `mark_reminded_for_window` for the scheduler
//! - 1.0.0: Initial record_action / set_interval / status / mark_reminded

use dashmap::DashMap;
use log::debug;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::catalog::MetricCatalog;
use super::record::{CareRecord, MetricState};
use super::store::CareStore;
use crate::core::{CareError, CareResult};

/// Applies care operations to records held in a [`CareStore`]
///
/// Read-modify-write operations on the same thread are serialized through a
/// per-thread lock, so an action and a concurrent reminder mark never
/// interleave.
#[derive(Clone)]
pub struct CareTracker {
    store: Arc<dyn CareStore>,
    catalog: Arc<MetricCatalog>,
    locks: Arc<DashMap<u64, Arc<Mutex<()>>>>,
}

/// Holds a thread's lock and removes the map entry on release when no other
/// operation is waiting for it
struct ThreadGuard<'a> {
    locks: &'a DashMap<u64, Arc<Mutex<()>>>,
    thread_id: u64,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ThreadGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        // Waiters hold their own clone, so a count of one means nobody else
        self.locks
            .remove_if(&self.thread_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl CareTracker {
    pub fn new(store: Arc<dyn CareStore>, catalog: Arc<MetricCatalog>) -> Self {
        CareTracker {
            store,
            catalog,
            locks: Arc::new(DashMap::new()),
        }
    }

    pub fn catalog(&self) -> &MetricCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &Arc<dyn CareStore> {
        &self.store
    }

    async fn lock_thread(&self, thread_id: u64) -> ThreadGuard<'_> {
        let lock = Arc::clone(self.locks.entry(thread_id).or_default().value());
        ThreadGuard {
            locks: &self.locks,
            thread_id,
            guard: Some(lock.lock_owned().await),
        }
    }

    async fn load_or_new(&self, thread_id: u64) -> CareResult<CareRecord> {
        Ok(self
            .store
            .get(thread_id)
            .await?
            .unwrap_or_else(|| CareRecord::new(thread_id)))
    }

    /// Log a care action at `now`, resetting the metric's reminder window
    pub async fn record_action(
        &self,
        thread_id: u64,
        metric: &str,
        now: i64,
    ) -> CareResult<CareRecord> {
        let _guard = self.lock_thread(thread_id).await;
        let mut record = self.load_or_new(thread_id).await?;

        let default_interval = self.catalog.default_interval_seconds(metric);
        let state = record
            .metrics
            .entry(metric.to_string())
            .or_insert_with(|| MetricState::new(default_interval));
        state.last_action_time = Some(now);
        state.reminded = false;

        self.store.upsert(&record).await?;
        debug!("Recorded {metric} for thread {thread_id} at {now}");
        Ok(record)
    }

    /// Set a metric's interval to `days` day units
    pub async fn set_interval(
        &self,
        thread_id: u64,
        metric: &str,
        days: i64,
    ) -> CareResult<CareRecord> {
        if days <= 0 {
            return Err(CareError::InvalidArgument(format!(
                "interval must be a positive number of days, got {days}"
            )));
        }
        let interval_seconds = days
            .checked_mul(self.catalog.day_seconds())
            .ok_or_else(|| CareError::InvalidArgument(format!("interval of {days} days is too long")))?;

        let _guard = self.lock_thread(thread_id).await;
        let mut record = self.load_or_new(thread_id).await?;

        record
            .metrics
            .entry(metric.to_string())
            .and_modify(|state| state.interval_seconds = interval_seconds)
            .or_insert_with(|| MetricState::new(interval_seconds));

        self.store.upsert(&record).await?;
        debug!("Set {metric} interval for thread {thread_id} to {days} day(s)");
        Ok(record)
    }

    pub async fn status(&self, thread_id: u64) -> CareResult<Option<CareRecord>> {
        self.store.get(thread_id).await
    }

    /// True iff the metric was logged, is unreminded and its deadline passed
    pub fn is_due(record: &CareRecord, metric: &str, now: i64) -> bool {
        record
            .metric(metric)
            .map(|state| state.is_due(now))
            .unwrap_or(false)
    }

    /// Flag the metric's current window as reminded
    ///
    /// Does nothing when the record or metric is missing or the metric was
    /// never logged.
    pub async fn mark_reminded(&self, thread_id: u64, metric: &str) -> CareResult<()> {
        let _guard = self.lock_thread(thread_id).await;
        let Some(mut record) = self.store.get(thread_id).await? else {
            return Ok(());
        };
        let Some(state) = record.metrics.get_mut(metric) else {
            return Ok(());
        };
        if state.last_action_time.is_none() || state.reminded {
            return Ok(());
        }

        state.reminded = true;
        self.store.upsert(&record).await
    }

    /// Like [`mark_reminded`](Self::mark_reminded) but only if the window that
    /// was observed as due is still the current one
    ///
    /// Returns `false` when an action was logged after `last_action_time` was
    /// read, in which case the new window stays unreminded.
    pub async fn mark_reminded_for_window(
        &self,
        thread_id: u64,
        metric: &str,
        last_action_time: i64,
    ) -> CareResult<bool> {
        let _guard = self.lock_thread(thread_id).await;
        let Some(mut record) = self.store.get(thread_id).await? else {
            return Ok(false);
        };
        let Some(state) = record.metrics.get_mut(metric) else {
            return Ok(false);
        };
        if state.last_action_time != Some(last_action_time) {
            debug!(
                "Thread {thread_id} {metric}: window moved since the scan, leaving it unreminded"
            );
            return Ok(false);
        }
        if state.reminded {
            return Ok(true);
        }

        state.reminded = true;
        self.store.upsert(&record).await?;
        Ok(true)
    }
}
