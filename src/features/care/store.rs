//! Storage seam consumed by the care tracker and the scheduler

use async_trait::async_trait;

use super::record::CareRecord;
use crate::core::CareResult;

/// Minimal persistence contract for care records
///
/// Implementations must make `upsert` durable before returning and must not
/// let concurrent upserts for different threads corrupt each other.
#[async_trait]
pub trait CareStore: Send + Sync {
    async fn get(&self, thread_id: u64) -> CareResult<Option<CareRecord>>;

    async fn upsert(&self, record: &CareRecord) -> CareResult<()>;

    /// Snapshot of every record at call time
    async fn list_all(&self) -> CareResult<Vec<CareRecord>>;
}
