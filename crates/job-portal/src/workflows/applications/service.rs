use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::board::KanbanBoard;
use super::domain::{
    ApplicationId, ApplicationRecord, ApplicationStatus, JobId, StatusHistoryEntry, UserId,
};
use super::history::history_status_for;
use super::policy::PipelineSettings;
use super::repository::{
    ApplicationRepository, ApplicationStatusView, Clock, NewApplication, RepositoryError,
    StatusTransition, SystemClock,
};
use super::request::StatusUpdateRequest;
use super::resolver::{Resolution, ResolutionError};

/// Service resolving board selections and applying them to stored applications.
pub struct ApplicationStatusService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    settings: PipelineSettings,
}

/// Result of a status update, reported as success whether or not anything changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionOutcome {
    pub application: ApplicationStatusView,
    pub previous: ApplicationStatus,
    pub changed: bool,
}

impl<R> ApplicationStatusService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(repository: Arc<R>, settings: PipelineSettings) -> Self {
        Self::with_clock(repository, Arc::new(SystemClock), settings)
    }

    pub fn with_clock(
        repository: Arc<R>,
        clock: Arc<dyn Clock>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            repository,
            clock,
            settings,
        }
    }

    pub fn settings(&self) -> PipelineSettings {
        self.settings
    }

    /// Start tracking a job for the caller. New applications begin as `INTERESTED`.
    pub fn create(
        &self,
        caller: UserId,
        job_id: JobId,
    ) -> Result<ApplicationRecord, StatusUpdateError> {
        let record = self.repository.insert(NewApplication {
            user_id: caller,
            job_id,
            created_at: self.clock.now(),
        })?;

        info!(
            application_id = record.id.0,
            user_id = caller.0,
            job_id = job_id.0,
            status = %record.status,
            "application created"
        );
        Ok(record)
    }

    /// Validate, resolve and apply a status update on behalf of the caller.
    pub fn update(
        &self,
        caller: UserId,
        request: StatusUpdateRequest,
    ) -> Result<TransitionOutcome, StatusUpdateError> {
        let application_id = request.application_id();
        let resolution = request.resolve().map_err(|err| {
            warn!(
                application_id = application_id.0,
                user_id = caller.0,
                error = %err,
                "rejected status update"
            );
            StatusUpdateError::from(err)
        })?;

        self.apply(caller, application_id, resolution)
    }

    /// Apply an already resolved status. Re-applying the stored status writes nothing.
    pub fn apply(
        &self,
        caller: UserId,
        application_id: ApplicationId,
        resolution: Resolution,
    ) -> Result<TransitionOutcome, StatusUpdateError> {
        let record = self.owned(caller, application_id)?;

        if record.status == resolution.status {
            debug!(
                application_id = application_id.0,
                user_id = caller.0,
                status = %record.status,
                "status unchanged; skipping history"
            );
            return Ok(TransitionOutcome {
                application: record.status_view(),
                previous: record.status,
                changed: false,
            });
        }

        if !self
            .settings
            .terminal_policy
            .permits(record.status, resolution.status)
        {
            warn!(
                application_id = application_id.0,
                user_id = caller.0,
                from = %record.status,
                to = %resolution.status,
                "transition out of terminal status refused"
            );
            return Err(StatusUpdateError::TerminalStatusLocked {
                current: record.status,
                requested: resolution.status,
            });
        }

        let now = self.clock.now();
        let history_status = history_status_for(resolution.status);
        let transition = StatusTransition {
            application_id,
            status: resolution.status,
            sub_stage: resolution.sub_stage,
            status_updated: now,
            history: StatusHistoryEntry {
                application_id,
                status: history_status,
                changed_at: now,
            },
        };

        let updated = self
            .repository
            .apply_transition(transition)
            .map_err(|err| self.persistence_failure(application_id, err))?;

        info!(
            application_id = application_id.0,
            user_id = caller.0,
            from = %record.status,
            to = %updated.status,
            history_status = %history_status,
            "application status changed"
        );

        Ok(TransitionOutcome {
            application: updated.status_view(),
            previous: record.status,
            changed: true,
        })
    }

    /// Fetch an application owned by the caller.
    pub fn get(
        &self,
        caller: UserId,
        application_id: ApplicationId,
    ) -> Result<ApplicationRecord, StatusUpdateError> {
        self.owned(caller, application_id)
    }

    /// Audit trail for an application owned by the caller, oldest first.
    pub fn history(
        &self,
        caller: UserId,
        application_id: ApplicationId,
    ) -> Result<Vec<StatusHistoryEntry>, StatusUpdateError> {
        self.owned(caller, application_id)?;
        self.repository
            .history(application_id)
            .map_err(|err| self.persistence_failure(application_id, err))
    }

    pub fn board(&self, caller: UserId) -> Result<KanbanBoard, StatusUpdateError> {
        let records = self.repository.list_for_user(caller).map_err(|err| {
            error!(user_id = caller.0, error = %err, "failed to list applications");
            StatusUpdateError::from(err)
        })?;
        Ok(KanbanBoard::from_records(records))
    }

    fn owned(
        &self,
        caller: UserId,
        application_id: ApplicationId,
    ) -> Result<ApplicationRecord, StatusUpdateError> {
        let record = self
            .repository
            .fetch_owned(application_id, caller)
            .map_err(|err| self.persistence_failure(application_id, err))?;

        record.ok_or_else(|| {
            warn!(
                application_id = application_id.0,
                user_id = caller.0,
                "application not found for caller"
            );
            StatusUpdateError::NotFound { application_id }
        })
    }

    fn persistence_failure(
        &self,
        application_id: ApplicationId,
        err: RepositoryError,
    ) -> StatusUpdateError {
        match err {
            RepositoryError::NotFound => StatusUpdateError::NotFound { application_id },
            other => {
                error!(application_id = application_id.0, error = %other, "persistence failure");
                StatusUpdateError::Persistence(other)
            }
        }
    }
}

/// Error raised by the application status service.
#[derive(Debug, thiserror::Error)]
pub enum StatusUpdateError {
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error("application {application_id} not found")]
    NotFound { application_id: ApplicationId },
    #[error("application is {current} and cannot move to {requested}")]
    TerminalStatusLocked {
        current: ApplicationStatus,
        requested: ApplicationStatus,
    },
    #[error("persistence failure: {0}")]
    Persistence(#[from] RepositoryError),
}
