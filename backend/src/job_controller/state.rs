//! Tracks background jobs started by the HTTP handlers.
//!
//! The only job kind today is the host-side sequential dispatch
//! (`services::dispatch`). The pieces are:
//! - `JobsState`: clonable shared state, injected into actix as `web::Data`.
//! - `JobUpdate`: a status change sent by a running job.
//! - `start_job_updater`: the task that applies `JobUpdate`s to the shared map.

use common::jobs::JobStatus;
use common::InviteError;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

/// Shared state of all background jobs.
#[derive(Clone)]
pub struct JobsState {
    /// Job ID to its last known status. Read by the status endpoint, written by
    /// the updater task and by job registration.
    pub jobs: Arc<RwLock<HashMap<String, JobStatus>>>,

    /// Running jobs push their progress here instead of locking `jobs` themselves.
    pub tx: mpsc::Sender<JobUpdate>,
}

/// A status change for one job.
#[derive(Debug)]
pub struct JobUpdate {
    pub(crate) job_id: String,
    pub(crate) status: JobStatus,
}

impl JobsState {
    /// Creates the shared state and spawns its updater on the current runtime.
    pub fn start() -> Self {
        let (tx, rx) = mpsc::channel(100);
        let state = JobsState {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            tx,
        };

        let updater_state = state.clone();
        tokio::spawn(async move {
            start_job_updater(updater_state, rx).await;
        });

        state
    }

    /// Registers `job_id` as `Pending` unless another job is still active.
    ///
    /// The check and the insert happen under one write lock, so two concurrent
    /// requests cannot both get through. Finished jobs are dropped at this point,
    /// so the map holds at most the previous run and the new one.
    pub async fn register_exclusive(&self, job_id: &str) -> Result<(), InviteError> {
        let mut jobs = self.jobs.write().await;
        if jobs.values().any(JobStatus::is_active) {
            return Err(InviteError::DispatchInProgress);
        }
        jobs.retain(|_, status| status.is_active());
        jobs.insert(job_id.to_string(), JobStatus::Pending);
        Ok(())
    }

    pub async fn status(&self, job_id: &str) -> Option<JobStatus> {
        self.jobs.read().await.get(job_id).cloned()
    }

    /// Queues a status change; lost only if the updater has stopped.
    pub async fn report(&self, job_id: &str, status: JobStatus) {
        let update = JobUpdate {
            job_id: job_id.to_string(),
            status,
        };
        if self.tx.send(update).await.is_err() {
            log::error!("job updater is gone, dropping update for {}", job_id);
        }
    }
}

/// Applies every received `JobUpdate` to the shared map until all senders are dropped.
pub async fn start_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>) {
    while let Some(update) = rx.recv().await {
        let mut jobs = state.jobs.write().await;
        jobs.insert(update.job_id.clone(), update.status);
    }
}
