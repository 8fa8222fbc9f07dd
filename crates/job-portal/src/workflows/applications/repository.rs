use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{
    ApplicationId, ApplicationRecord, ApplicationStatus, BoardColumn, HistoryStatus, JobId,
    StatusHistoryEntry, SubStage, UserId,
};
use super::history::history_status_for;

/// Fields supplied when an applicant starts tracking a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub user_id: UserId,
    pub job_id: JobId,
    pub created_at: DateTime<Utc>,
}

/// Status write plus the audit row it produces. Adapters persist both as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    pub application_id: ApplicationId,
    pub status: ApplicationStatus,
    pub sub_stage: Option<SubStage>,
    pub status_updated: DateTime<Utc>,
    pub history: StatusHistoryEntry,
}

/// Storage abstraction so the status service can be exercised in isolation.
pub trait ApplicationRepository: Send + Sync {
    /// Store a new application in `INTERESTED` with no sub-stage and assign its id.
    fn insert(&self, application: NewApplication) -> Result<ApplicationRecord, RepositoryError>;
    /// Ownership-scoped lookup; a foreign application is reported as `None`.
    fn fetch_owned(
        &self,
        id: ApplicationId,
        user_id: UserId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError>;
    fn list_for_user(&self, user_id: UserId) -> Result<Vec<ApplicationRecord>, RepositoryError>;
    /// Write status, sub-stage and `status_updated`, then append the history row, atomically.
    fn apply_transition(
        &self,
        transition: StatusTransition,
    ) -> Result<ApplicationRecord, RepositoryError>;
    /// History rows for an application in append order.
    fn history(&self, id: ApplicationId) -> Result<Vec<StatusHistoryEntry>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Source of the timestamps written to `status_updated` and `changed_at`.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Sanitized representation of an application's status for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStatusView {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub status: ApplicationStatus,
    pub sub_stage: Option<SubStage>,
    pub column: BoardColumn,
    pub history_status: HistoryStatus,
    pub status_updated: DateTime<Utc>,
}

impl ApplicationRecord {
    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            id: self.id,
            job_id: self.job_id,
            status: self.status,
            sub_stage: self.sub_stage,
            column: self.status.board_column(),
            history_status: history_status_for(self.status),
            status_updated: self.status_updated,
        }
    }
}
