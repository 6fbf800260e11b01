//! Job bookkeeping for callers that run optimizations in the background.
//!
//! The GA core never touches a store: it is a one-shot, synchronous call.
//! A host service that accepts submissions and lets clients poll for the
//! outcome records each run through a [`JobStore`]. [`InMemoryJobStore`] is
//! the process-local implementation; durable stores implement the same
//! trait.
//!
//! ```text
//! Pending ──> Processing ──> Completed(result)
//!                       └──> Failed(message)
//! ```

use crate::error::Result;
use crate::ga::{GroupingConfig, GroupingResult, GroupingRunner};
use crate::models::RawIndividual;
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Mutex;

/// Identifier assigned to a job by its store.
pub type JobId = u64;

/// Lifecycle state of a job.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JobStatus {
    Pending,
    Processing,
    Completed(Box<GroupingResult>),
    Failed(String),
}

impl JobStatus {
    /// Whether the job has reached a final state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed(_) | JobStatus::Failed(_))
    }
}

/// A submitted job: its parameters and current status.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JobRecord {
    /// Store-assigned identifier.
    pub id: JobId,
    /// Parameters the job runs with.
    pub config: GroupingConfig,
    /// Current lifecycle state.
    pub status: JobStatus,
}

/// Storage for job records.
pub trait JobStore: Send + Sync {
    /// Registers a new `Pending` job and returns its id.
    fn create(&self, config: GroupingConfig) -> JobId;

    /// Replaces the status of `id`. Returns `false` if the job is unknown.
    fn update_status(&self, id: JobId, status: JobStatus) -> bool;

    /// Snapshot of the job record.
    fn get(&self, id: JobId) -> Option<JobRecord>;

    /// Removes the job, returning its last record.
    fn delete(&self, id: JobId) -> Option<JobRecord>;
}

#[derive(Debug, Default)]
struct Jobs {
    next_id: JobId,
    records: HashMap<JobId, JobRecord>,
}

/// Process-local [`JobStore`] backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    inner: Mutex<Jobs>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored jobs.
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    /// Whether the store holds no jobs.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Jobs> {
        // poisoned locks still hold consistent records
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl JobStore for InMemoryJobStore {
    fn create(&self, config: GroupingConfig) -> JobId {
        let mut jobs = self.lock();
        jobs.next_id += 1;
        let id = jobs.next_id;
        jobs.records.insert(
            id,
            JobRecord {
                id,
                config,
                status: JobStatus::Pending,
            },
        );
        id
    }

    fn update_status(&self, id: JobId, status: JobStatus) -> bool {
        match self.lock().records.get_mut(&id) {
            Some(record) => {
                record.status = status;
                true
            }
            None => false,
        }
    }

    fn get(&self, id: JobId) -> Option<JobRecord> {
        self.lock().records.get(&id).cloned()
    }

    fn delete(&self, id: JobId) -> Option<JobRecord> {
        self.lock().records.remove(&id)
    }
}

/// Runs a stored job to completion.
///
/// Marks the job `Processing`, runs the GA with the job's configuration and
/// records `Completed` or `Failed`. The outcome is also returned to the
/// caller. Unknown jobs are reported as `None`.
pub fn run_job<S: JobStore + ?Sized>(
    store: &S,
    id: JobId,
    individuals: &[RawIndividual],
) -> Option<Result<GroupingResult>> {
    let record = store.get(id)?;
    store.update_status(id, JobStatus::Processing);
    info!("job {id}: processing {} individuals", individuals.len());

    let outcome = GroupingRunner::run_raw(individuals, &record.config);
    let status = match &outcome {
        Ok(result) => {
            info!(
                "job {id}: completed with normalized fitness {:.3}",
                result.statistics.normalized_fitness
            );
            JobStatus::Completed(Box::new(result.clone()))
        }
        Err(err) => {
            warn!("job {id}: failed: {err}");
            JobStatus::Failed(err.to_string())
        }
    };
    store.update_status(id, status);
    Some(outcome)
}
