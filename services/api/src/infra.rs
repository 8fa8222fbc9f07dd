use job_portal::workflows::applications::{
    ApplicationId, ApplicationRecord, ApplicationRepository, ApplicationStatus, NewApplication,
    RepositoryError, StatusHistoryEntry, StatusTransition, UserId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct Tables {
    next_id: u64,
    applications: BTreeMap<ApplicationId, ApplicationRecord>,
    status_history: Vec<StatusHistoryEntry>,
}

/// Process-local store. The status write and its history row share one lock, so a
/// transition is never half applied.
#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryApplicationRepository {
    fn lock(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("application store lock poisoned".into()))
    }
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, application: NewApplication) -> Result<ApplicationRecord, RepositoryError> {
        let mut tables = self.lock()?;
        tables.next_id += 1;
        let record = ApplicationRecord {
            id: ApplicationId(tables.next_id),
            user_id: application.user_id,
            job_id: application.job_id,
            status: ApplicationStatus::Interested,
            sub_stage: None,
            status_updated: application.created_at,
            created_at: application.created_at,
        };
        if tables.applications.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.applications.insert(record.id, record.clone());
        Ok(record)
    }

    fn fetch_owned(
        &self,
        id: ApplicationId,
        user_id: UserId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let tables = self.lock()?;
        Ok(tables
            .applications
            .get(&id)
            .filter(|record| record.user_id == user_id)
            .cloned())
    }

    fn list_for_user(&self, user_id: UserId) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let tables = self.lock()?;
        Ok(tables
            .applications
            .values()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect())
    }

    fn apply_transition(
        &self,
        transition: StatusTransition,
    ) -> Result<ApplicationRecord, RepositoryError> {
        let mut tables = self.lock()?;
        let record = tables
            .applications
            .get_mut(&transition.application_id)
            .ok_or(RepositoryError::NotFound)?;
        record.status = transition.status;
        record.sub_stage = transition.sub_stage;
        record.status_updated = transition.status_updated;
        let updated = record.clone();
        tables.status_history.push(transition.history);
        Ok(updated)
    }

    fn history(&self, id: ApplicationId) -> Result<Vec<StatusHistoryEntry>, RepositoryError> {
        let tables = self.lock()?;
        Ok(tables
            .status_history
            .iter()
            .filter(|entry| entry.application_id == id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use job_portal::workflows::applications::{HistoryStatus, JobId, SubStage};

    #[test]
    fn transition_updates_record_and_appends_history_together() {
        let repository = InMemoryApplicationRepository::default();
        let now = Utc::now();
        let record = repository
            .insert(NewApplication {
                user_id: UserId(1),
                job_id: JobId(10),
                created_at: now,
            })
            .expect("insert succeeds");

        let updated = repository
            .apply_transition(StatusTransition {
                application_id: record.id,
                status: ApplicationStatus::PhoneScreening,
                sub_stage: Some(SubStage::PhoneScreening),
                status_updated: now,
                history: StatusHistoryEntry {
                    application_id: record.id,
                    status: HistoryStatus::Interviewing,
                    changed_at: now,
                },
            })
            .expect("transition succeeds");

        assert_eq!(updated.status, ApplicationStatus::PhoneScreening);
        assert_eq!(repository.history(record.id).expect("history").len(), 1);
        assert!(repository
            .fetch_owned(record.id, UserId(2))
            .expect("fetch succeeds")
            .is_none());
    }

    #[test]
    fn transition_on_missing_record_leaves_history_untouched() {
        let repository = InMemoryApplicationRepository::default();
        let now = Utc::now();
        let missing = ApplicationId(404);

        let result = repository.apply_transition(StatusTransition {
            application_id: missing,
            status: ApplicationStatus::Rejected,
            sub_stage: None,
            status_updated: now,
            history: StatusHistoryEntry {
                application_id: missing,
                status: HistoryStatus::Rejected,
                changed_at: now,
            },
        });

        assert!(matches!(result, Err(RepositoryError::NotFound)));
        assert!(repository.history(missing).expect("history").is_empty());
    }
}
