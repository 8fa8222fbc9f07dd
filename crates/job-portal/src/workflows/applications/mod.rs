//! Application status engine: Kanban column resolution, transitions, and the audit trail.
//!
//! Board selections (a column plus an optional sub-stage) resolve to one canonical
//! [`ApplicationStatus`]. The service applies it to an application owned by the caller,
//! skipping redundant writes, and records a coarse [`HistoryStatus`] for every real change.

pub mod board;
pub mod domain;
pub mod history;
pub mod policy;
pub mod repository;
pub mod request;
pub mod resolver;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use board::{BoardCard, BoardLane, KanbanBoard};
pub use domain::{
    ApplicationId, ApplicationRecord, ApplicationStatus, BoardColumn, HistoryStatus, JobId,
    StatusHistoryEntry, SubStage, UserId,
};
pub use history::{history_status_for, history_status_for_label};
pub use policy::{PipelineSettings, TerminalStatusPolicy};
pub use repository::{
    ApplicationRepository, ApplicationStatusView, Clock, NewApplication, RepositoryError,
    StatusTransition, SystemClock,
};
pub use request::{ColumnStatusPayload, DirectStatusPayload, StatusUpdateRequest};
pub use resolver::{
    column_default_status, resolve_direct_status, resolve_status, sub_stage_status, Resolution,
    ResolutionError,
};
pub use router::{application_router, CallerId, CALLER_HEADER};
pub use service::{ApplicationStatusService, StatusUpdateError, TransitionOutcome};
