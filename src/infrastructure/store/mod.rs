use crate::domain::job::{Job, JobStatus};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory store shared by every handler and the conversion workers.
///
/// All reads return clones so callers never hold the lock across awaits.
pub struct JobStore {
    jobs: RwLock<HashMap<Uuid, Job>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, job: Job) {
        let mut jobs = self.jobs.write().await;
        jobs.insert(job.id, job);
    }

    pub async fn get(&self, id: Uuid) -> Option<Job> {
        let jobs = self.jobs.read().await;
        jobs.get(&id).cloned()
    }

    /// All jobs, newest first
    pub async fn list(&self) -> Vec<Job> {
        let jobs = self.jobs.read().await;
        let mut list: Vec<Job> = jobs.values().cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }

    /// Apply `f` to the job under the write lock; returns the updated job
    pub async fn update<F>(&self, id: Uuid, f: F) -> Option<Job>
    where
        F: FnOnce(&mut Job),
    {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id)?;
        f(job);
        Some(job.clone())
    }

    /// Validate and mutate the job in one write-lock acquisition.
    ///
    /// `f` must only mutate the job when it returns `Ok`; on `Err` the
    /// job is left as the closure left it, so bail out before touching
    /// anything. Returns `None` when the job does not exist.
    pub async fn try_update<F, E>(&self, id: Uuid, f: F) -> Option<Result<Job, E>>
    where
        F: FnOnce(&mut Job) -> Result<(), E>,
    {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id)?;
        Some(f(job).map(|()| job.clone()))
    }

    pub async fn is_cancelled(&self, id: Uuid) -> bool {
        let jobs = self.jobs.read().await;
        jobs.get(&id)
            .map(|job| job.status == JobStatus::Cancelled)
            .unwrap_or(true)
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}
