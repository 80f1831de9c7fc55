use serde::{Deserialize, Serialize};

/// Status of a background job tracked by the backend job controller.
///
/// `InProgress` carries a completion percentage in `0..=100`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    InProgress(u32),
    Completed(String),
    Failed(String),
}

impl JobStatus {
    /// `true` while the job has not reached a terminal state.
    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::InProgress(_))
    }
}
