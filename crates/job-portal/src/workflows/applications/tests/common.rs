use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::applications::domain::{
    ApplicationId, ApplicationRecord, ApplicationStatus, JobId, StatusHistoryEntry, UserId,
};
use crate::workflows::applications::repository::{
    ApplicationRepository, Clock, NewApplication, RepositoryError, StatusTransition,
};
use crate::workflows::applications::{
    application_router, ApplicationStatusService, PipelineSettings, TerminalStatusPolicy,
};

pub(super) const OWNER: UserId = UserId(7);
pub(super) const STRANGER: UserId = UserId(99);

pub(super) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Advances one minute per reading so every write gets a distinct timestamp.
#[derive(Debug)]
pub(super) struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
}

impl Default for SteppingClock {
    fn default() -> Self {
        Self {
            next: Mutex::new(base_time()),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut guard = self.next.lock().expect("clock mutex poisoned");
        let current = *guard;
        *guard = current + Duration::minutes(1);
        current
    }
}

#[derive(Default)]
struct MemoryState {
    next_id: u64,
    records: BTreeMap<ApplicationId, ApplicationRecord>,
    history: Vec<StatusHistoryEntry>,
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryRepository {
    pub(super) fn history_len(&self) -> usize {
        self.state.lock().expect("repository mutex poisoned").history.len()
    }

    pub(super) fn stored(&self, id: ApplicationId) -> ApplicationRecord {
        self.state
            .lock()
            .expect("repository mutex poisoned")
            .records
            .get(&id)
            .cloned()
            .expect("record present")
    }

    pub(super) fn seed(&self, user_id: UserId, status: ApplicationStatus) -> ApplicationRecord {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        guard.next_id += 1;
        let record = ApplicationRecord {
            id: ApplicationId(guard.next_id),
            user_id,
            job_id: JobId(500 + guard.next_id),
            status,
            sub_stage: None,
            status_updated: base_time() - Duration::days(1),
            created_at: base_time() - Duration::days(2),
        };
        guard.records.insert(record.id, record.clone());
        record
    }
}

impl ApplicationRepository for MemoryRepository {
    fn insert(&self, application: NewApplication) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        guard.next_id += 1;
        let record = ApplicationRecord {
            id: ApplicationId(guard.next_id),
            user_id: application.user_id,
            job_id: application.job_id,
            status: ApplicationStatus::Interested,
            sub_stage: None,
            status_updated: application.created_at,
            created_at: application.created_at,
        };
        guard.records.insert(record.id, record.clone());
        Ok(record)
    }

    fn fetch_owned(
        &self,
        id: ApplicationId,
        user_id: UserId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard
            .records
            .get(&id)
            .filter(|record| record.user_id == user_id)
            .cloned())
    }

    fn list_for_user(&self, user_id: UserId) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard
            .records
            .values()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect())
    }

    fn apply_transition(
        &self,
        transition: StatusTransition,
    ) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        let record = guard
            .records
            .get_mut(&transition.application_id)
            .ok_or(RepositoryError::NotFound)?;
        record.status = transition.status;
        record.sub_stage = transition.sub_stage;
        record.status_updated = transition.status_updated;
        let updated = record.clone();
        guard.history.push(transition.history);
        Ok(updated)
    }

    fn history(&self, id: ApplicationId) -> Result<Vec<StatusHistoryEntry>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard
            .history
            .iter()
            .filter(|entry| entry.application_id == id)
            .cloned()
            .collect())
    }
}

/// Reads succeed but every write fails, to exercise the 500 path.
#[derive(Default, Clone)]
pub(super) struct ReadOnlyRepository {
    pub(super) inner: MemoryRepository,
}

impl ApplicationRepository for ReadOnlyRepository {
    fn insert(&self, _application: NewApplication) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("read only replica".to_string()))
    }

    fn fetch_owned(
        &self,
        id: ApplicationId,
        user_id: UserId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        self.inner.fetch_owned(id, user_id)
    }

    fn list_for_user(&self, user_id: UserId) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        self.inner.list_for_user(user_id)
    }

    fn apply_transition(
        &self,
        _transition: StatusTransition,
    ) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("read only replica".to_string()))
    }

    fn history(&self, id: ApplicationId) -> Result<Vec<StatusHistoryEntry>, RepositoryError> {
        self.inner.history(id)
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(&self, _application: NewApplication) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_owned(
        &self,
        _id: ApplicationId,
        _user_id: UserId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_for_user(&self, _user_id: UserId) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn apply_transition(
        &self,
        _transition: StatusTransition,
    ) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn history(&self, _id: ApplicationId) -> Result<Vec<StatusHistoryEntry>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn settings(policy: TerminalStatusPolicy) -> PipelineSettings {
    PipelineSettings {
        terminal_policy: policy,
        disclose_error_details: true,
    }
}

pub(super) fn build_service() -> (
    ApplicationStatusService<MemoryRepository>,
    Arc<MemoryRepository>,
) {
    build_service_with(TerminalStatusPolicy::Reopenable)
}

pub(super) fn build_service_with(
    policy: TerminalStatusPolicy,
) -> (
    ApplicationStatusService<MemoryRepository>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = ApplicationStatusService::with_clock(
        repository.clone(),
        Arc::new(SteppingClock::default()),
        settings(policy),
    );
    (service, repository)
}

pub(super) fn application_router_with_service(
    service: ApplicationStatusService<MemoryRepository>,
) -> axum::Router {
    application_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
